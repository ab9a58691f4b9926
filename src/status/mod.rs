use std::io::{self, Write};

use tracing::error;

use crate::types::preparation::PreparationResult;

/// Receives one finished beverage at a time.
pub trait StatusSink {
    fn emit(&mut self, beverage: &str, result: &PreparationResult);
}

pub fn status_line(beverage: &str, result: &PreparationResult) -> String {
    match result {
        PreparationResult::Prepared => format!("{beverage} is prepared"),
        PreparationResult::Failed(reason) => {
            format!("{beverage} cannot be prepared because {reason}")
        }
    }
}

/// Writes status lines to standard output.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl StatusSink for StdoutSink {
    fn emit(&mut self, beverage: &str, result: &PreparationResult) {
        let mut stdout = io::stdout().lock();
        if let Err(error) = writeln!(stdout, "{}", status_line(beverage, result)) {
            error!(%beverage, ?error, "failed to write status line");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispenser::report::{BatchReport, DispenseReport, Dispensed};
    use crate::types::preparation::FailureReason;

    #[derive(Debug, Default)]
    struct MemorySink {
        lines: Vec<String>,
    }

    impl StatusSink for MemorySink {
        fn emit(&mut self, beverage: &str, result: &PreparationResult) {
            self.lines.push(status_line(beverage, result));
        }
    }

    #[test]
    fn report_emits_one_line_per_beverage_in_batch_order() {
        let mut report = DispenseReport::default();
        report.push(BatchReport {
            index: 0,
            busy_at_start: 0,
            results: vec![
                Dispensed {
                    beverage: "hot_coffee".to_string(),
                    outlet: 1,
                    result: PreparationResult::Prepared,
                },
                Dispensed {
                    beverage: "hot_tea".to_string(),
                    outlet: 0,
                    result: PreparationResult::Prepared,
                },
            ],
        });
        report.push(BatchReport {
            index: 1,
            busy_at_start: 0,
            results: vec![Dispensed {
                beverage: "green_tea".to_string(),
                outlet: 0,
                result: PreparationResult::Failed(FailureReason::IngredientUnavailable {
                    ingredient: "green_mixture".to_string(),
                }),
            }],
        });

        let mut sink = MemorySink::default();
        report.emit_to(&mut sink);

        assert_eq!(
            sink.lines,
            [
                "hot_coffee is prepared",
                "hot_tea is prepared",
                "green_tea cannot be prepared because green_mixture is not available",
            ]
        );
    }

    #[test]
    fn insufficient_line_names_the_item() {
        let line = status_line(
            "black_tea",
            &PreparationResult::Failed(FailureReason::IngredientInsufficient {
                ingredient: "hot_water".to_string(),
            }),
        );

        assert_eq!(
            line,
            "black_tea cannot be prepared because item hot_water is not sufficient"
        );
    }
}
