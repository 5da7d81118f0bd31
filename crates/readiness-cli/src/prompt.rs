//! Interactive terminal source
//!
//! Shows each stage's questions with numbered options. At any question the
//! respondent may type `b` to go back or `q` to quit; on the finished screen
//! `r` starts over.

use crate::driver::{Action, AnswerSource, DriverError, Event};
use readiness_core::catalog::{Input, Question};
use readiness_core::{Session, StageAnswers, Submission, WizardError};
use std::io::{BufRead, Write};

enum Reply {
    Answer(String),
    Command(Action),
}

/// [`AnswerSource`] reading from a terminal (or any line reader)
#[derive(Debug)]
pub struct PromptSource<I, O> {
    input: I,
    output: O,
}

impl<I: BufRead, O: Write> PromptSource<I, O> {
    /// Prompt on `output`, read replies from `input`
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }

    /// Consume the source, returning the output writer
    pub fn into_output(self) -> O {
        self.output
    }

    fn read_line(&mut self) -> Result<Option<String>, DriverError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask(&mut self, question: &Question) -> Result<Reply, DriverError> {
        loop {
            writeln!(self.output, "{}", question.prompt)?;
            let options = question.options();
            for (i, option) in options.iter().enumerate() {
                writeln!(self.output, "  {}) {}", i + 1, option)?;
            }
            write!(self.output, "> ")?;
            self.output.flush()?;

            let Some(reply) = self.read_line()? else {
                return Ok(Reply::Command(Action::Quit));
            };
            match reply.as_str() {
                "b" | "B" => return Ok(Reply::Command(Action::Back)),
                "q" | "Q" => return Ok(Reply::Command(Action::Quit)),
                _ => {}
            }

            match question.input {
                Input::Text if !reply.is_empty() => return Ok(Reply::Answer(reply)),
                Input::Choice { .. } => {
                    if let Some(option) = reply
                        .parse::<usize>()
                        .ok()
                        .and_then(|n| n.checked_sub(1))
                        .and_then(|i| options.get(i))
                    {
                        return Ok(Reply::Answer((*option).to_string()));
                    }
                    writeln!(self.output, "Please choose 1-{}.", options.len())?;
                }
                Input::Text => writeln!(self.output, "This field is required.")?,
            }
        }
    }

    fn finished_screen(&mut self) -> Result<Action, DriverError> {
        loop {
            write!(self.output, "[r] start a new assessment, [q] quit > ")?;
            self.output.flush()?;
            match self.read_line()?.as_deref() {
                None | Some("q" | "Q") => return Ok(Action::Quit),
                Some("r" | "R") => return Ok(Action::Reset),
                Some(_) => {}
            }
        }
    }
}

impl<I: BufRead, O: Write> AnswerSource for PromptSource<I, O> {
    fn next_action(&mut self, session: &Session) -> Result<Action, DriverError> {
        let Some(set) = session.question_set() else {
            return self.finished_screen();
        };

        writeln!(self.output, "\n== {} ==", set.title)?;
        if !set.intro.is_empty() {
            writeln!(self.output, "{}", set.intro)?;
        }

        let mut answers = StageAnswers::new();
        for question in set.questions {
            match self.ask(question)? {
                Reply::Answer(value) => answers.set(question.key, value),
                Reply::Command(action) => return Ok(action),
            }
        }
        Ok(Action::Submit(Submission::new(set.stage, answers)))
    }

    fn notify(&mut self, event: &Event<'_>) -> Result<(), DriverError> {
        match event {
            Event::Showing(_) => {}
            Event::Rejected(WizardError::Validation(v)) => {
                let keys: Vec<&str> = v.keys().collect();
                writeln!(self.output, "Please answer all questions: {}", keys.join(", "))?;
            }
            Event::Rejected(e) => writeln!(self.output, "Not possible here: {e}")?,
            Event::Completed { completion, report } => {
                writeln!(
                    self.output,
                    "\nAssessment complete ({}).",
                    completion.classification
                )?;
                match report {
                    Some(path) => writeln!(self.output, "Report saved to {}", path.display())?,
                    None => writeln!(self.output, "The report could not be generated.")?,
                }
                if completion.persistence_error.is_some() {
                    writeln!(self.output, "Warning: your answers could not be saved.")?;
                }
            }
            Event::Restarted => writeln!(self.output, "\nStarting a new assessment.")?,
        }
        Ok(())
    }
}
