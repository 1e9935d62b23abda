#![allow(dead_code)]

use color_eyre::Result;
use polars::prelude::*;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use studex::chart::{ChartBackend, ChartSpec};
use studex::menu::Console;
use studex::table::StudentTable;

/// A small table with the full required schema: 12 rows, two duplicate
/// pairs, and one missing G1 value.
pub fn student_table() -> StudentTable {
    let df = df!(
        "school" => &["GP", "GP", "GP", "MS", "MS", "GP", "GP", "MS", "GP", "MS", "GP", "MS"],
        "sex" => &["F", "F", "M", "F", "M", "F", "M", "F", "F", "M", "F", "F"],
        "Medu" => &[4i64, 4, 2, 3, 1, 4, 2, 3, 1, 2, 3, 3],
        "Fedu" => &[4i64, 4, 2, 2, 1, 3, 2, 2, 1, 2, 3, 2],
        "studytime" => &[2i64, 2, 1, 3, 2, 2, 1, 3, 4, 1, 2, 3],
        "G1" => &[Some(14i64), Some(14), Some(8), Some(12), None, Some(15), Some(9), Some(12), Some(6), Some(10), Some(11), Some(12)],
        "G2" => &[15i64, 15, 9, 12, 7, 15, 10, 12, 7, 11, 12, 12],
        "G3" => &[15i64, 15, 10, 13, 8, 16, 10, 14, 6, 11, 12, 13],
    )
    .unwrap();
    StudentTable::from_dataframe(df)
}

/// A console fed from a fixed script of answers, recording everything the
/// session prints. Once the script runs out, `prompt` reports a closed
/// input source.
pub struct ScriptedConsole {
    answers: Vec<String>,
    next: usize,
    pub output: Vec<String>,
}

impl ScriptedConsole {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|s| s.to_string()).collect(),
            next: 0,
            output: Vec::new(),
        }
    }

    pub fn printed(&self) -> String {
        self.output.join("\n")
    }
}

impl Console for ScriptedConsole {
    fn print(&mut self, text: &str) -> Result<()> {
        self.output.push(text.to_string());
        Ok(())
    }

    fn prompt(&mut self, _text: &str) -> Result<Option<String>> {
        if self.next >= self.answers.len() {
            return Ok(None);
        }
        let answer = self.answers[self.next].clone();
        self.next += 1;
        Ok(Some(answer))
    }
}

/// A chart backend that records the specs it was asked to render instead
/// of drawing anything.
#[derive(Clone, Default)]
pub struct RecordingBackend {
    pub specs: Rc<RefCell<Vec<ChartSpec>>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rendered(&self) -> Vec<ChartSpec> {
        self.specs.borrow().clone()
    }
}

impl ChartBackend for RecordingBackend {
    fn show(&self, spec: &ChartSpec, _table: &StudentTable) -> Result<PathBuf> {
        self.specs.borrow_mut().push(spec.clone());
        Ok(PathBuf::from(format!("recorded-{}.png", spec.kind.as_str())))
    }
}
