use crate::core::predictor::Predictor;
use crate::core::Result;
use crate::domain::model::{
    Gender, Lunch, ParentalEducation, RaceEthnicity, StudentRecord, TestPreparation,
};
use std::fmt::Display;
use std::io::{BufRead, Write};

pub const TITLE: &str = "Student Academic Performance Predictor";
pub const DESCRIPTION: &str = "Predict student average score based on background and preparation.";
pub const POINT_ESTIMATE_NOTE: &str =
    "Note: This prediction is a point estimate based on the model's training data.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormSummary {
    pub submissions: usize,
    pub failures: usize,
}

enum Selection<T> {
    Chosen(T),
    Quit,
}

/// Line-oriented form: five numbered select boxes, then a submit.
///
/// A failed prediction prints one error line and the form starts over;
/// only IO errors on the terminal end the loop early.
pub struct PredictionForm<'a, R: BufRead, W: Write> {
    predictor: &'a Predictor,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> PredictionForm<'a, R, W> {
    pub fn new(predictor: &'a Predictor, input: R, output: W) -> Self {
        Self {
            predictor,
            input,
            output,
        }
    }

    pub fn run(&mut self) -> Result<FormSummary> {
        let mut summary = FormSummary::default();

        writeln!(self.output, "{}", TITLE)?;
        writeln!(self.output, "{}", DESCRIPTION)?;

        while let Some(record) = self.fill_in()? {
            summary.submissions += 1;
            if !self.submit(&record)? {
                summary.failures += 1;
            }
        }

        writeln!(self.output, "Goodbye.")?;
        self.output.flush()?;
        Ok(summary)
    }

    fn fill_in(&mut self) -> Result<Option<StudentRecord>> {
        writeln!(self.output)?;
        writeln!(self.output, "Student Information")?;

        let Selection::Chosen(gender) = self.select("Gender", Gender::ALL)? else {
            return Ok(None);
        };
        let Selection::Chosen(race_ethnicity) = self.select("Race/Ethnicity", RaceEthnicity::ALL)?
        else {
            return Ok(None);
        };
        let Selection::Chosen(parental_education) =
            self.select("Parental Level of Education", ParentalEducation::ALL)?
        else {
            return Ok(None);
        };
        let Selection::Chosen(lunch) = self.select("Lunch Type", Lunch::ALL)? else {
            return Ok(None);
        };
        let Selection::Chosen(test_preparation) =
            self.select("Test Preparation Course", TestPreparation::ALL)?
        else {
            return Ok(None);
        };

        Ok(Some(StudentRecord {
            gender,
            race_ethnicity,
            parental_education,
            lunch,
            test_preparation,
        }))
    }

    fn select<T: Copy + Display>(&mut self, label: &str, options: &[T]) -> Result<Selection<T>> {
        writeln!(self.output, "{}", label)?;
        for (index, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}) {}", index + 1, option)?;
        }

        loop {
            write!(
                self.output,
                "Select [1-{}, Enter = {}, q = quit]: ",
                options.len(),
                options[0]
            )?;
            self.output.flush()?;

            // Undecodable bytes become U+FFFD and fall through to a re-prompt.
            let mut buf = Vec::new();
            if self.input.read_until(b'\n', &mut buf)? == 0 {
                return Ok(Selection::Quit);
            }
            let line = String::from_utf8_lossy(&buf);

            match parse_choice(line.trim(), options) {
                Choice::Index(index) => return Ok(Selection::Chosen(options[index])),
                Choice::Quit => return Ok(Selection::Quit),
                Choice::Invalid => {
                    writeln!(self.output, "Please choose one of the listed options.")?;
                }
            }
        }
    }

    /// Returns whether a score was shown.
    fn submit(&mut self, record: &StudentRecord) -> Result<bool> {
        tracing::debug!("Form submitted: {:?}", record);

        match self.predictor.predict(record) {
            Ok(prediction) => {
                tracing::info!("Predicted average score {:.2}", prediction.score);
                writeln!(self.output)?;
                writeln!(self.output, "Prediction Result")?;
                writeln!(
                    self.output,
                    "The predicted average score is: {:.2}",
                    prediction.score
                )?;
                writeln!(self.output, "{}", POINT_ESTIMATE_NOTE)?;
                Ok(true)
            }
            Err(e) => {
                tracing::error!("Prediction failed: {} (Category: {:?})", e, e.category());
                writeln!(self.output)?;
                writeln!(self.output, "An error occurred during prediction: {}", e)?;
                Ok(false)
            }
        }
    }
}

enum Choice {
    Index(usize),
    Quit,
    Invalid,
}

// Accepts a 1-based number, an option label, or empty input for the first option.
fn parse_choice<T: Display>(input: &str, options: &[T]) -> Choice {
    if input.is_empty() {
        return Choice::Index(0);
    }
    if input.eq_ignore_ascii_case("q") || input.eq_ignore_ascii_case("quit") {
        return Choice::Quit;
    }
    if let Ok(number) = input.parse::<usize>() {
        return if (1..=options.len()).contains(&number) {
            Choice::Index(number - 1)
        } else {
            Choice::Invalid
        };
    }
    options
        .iter()
        .position(|o| o.to_string().eq_ignore_ascii_case(input))
        .map(Choice::Index)
        .unwrap_or(Choice::Invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choice() {
        let options = Lunch::ALL;
        assert!(matches!(parse_choice("", options), Choice::Index(0)));
        assert!(matches!(parse_choice("2", options), Choice::Index(1)));
        assert!(matches!(parse_choice("free/reduced", options), Choice::Index(1)));
        assert!(matches!(parse_choice("Q", options), Choice::Quit));
        assert!(matches!(parse_choice("0", options), Choice::Invalid));
        assert!(matches!(parse_choice("3", options), Choice::Invalid));
        assert!(matches!(parse_choice("maybe", options), Choice::Invalid));
    }
}
