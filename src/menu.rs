//! The interactive menu loop: a state machine over main menu, analytics
//! submenu, tour, and termination.
//!
//! All console interaction goes through the [`Console`] trait and all chart
//! output through [`ChartBackend`], so a scripted front end can drive a
//! session without a terminal. Every failure caused by user input is
//! reported and leaves the session in a re-promptable state; the only way
//! out is the `exit` command or a closed input source.

use color_eyre::Result;
use std::io::Write;

use crate::chart::{self, ChartBackend, ChartSpec};
use crate::cli::StartupAction;
use crate::config::AppConfig;
use crate::describe;
use crate::error::AnalysisError;
use crate::sample;
use crate::stats;
use crate::table::{ColumnKind, StudentTable};
use crate::tour;

/// A blocking line-oriented input/output source. `prompt` suspends the
/// session until a line arrives; `None` means the source is closed.
pub trait Console {
    fn print(&mut self, text: &str) -> Result<()>;
    fn prompt(&mut self, text: &str) -> Result<Option<String>>;
}

/// The stdin/stdout console used by the real application.
#[derive(Default)]
pub struct StdConsole;

impl StdConsole {
    pub fn new() -> Self {
        Self
    }
}

impl Console for StdConsole {
    fn print(&mut self, text: &str) -> Result<()> {
        println!("{}", text);
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        print!("{}", text);
        std::io::stdout().flush()?;
        let mut line = String::new();
        let bytes = std::io::stdin().read_line(&mut line)?;
        if bytes == 0 {
            Ok(None)
        } else {
            Ok(Some(line.trim().to_string()))
        }
    }
}

/// The session states. Exactly one is active; unrecognized commands keep
/// the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Main,
    Analytics,
    Tour,
    Terminated,
}

const MAIN_PROMPT: &str = "\
If you'd like a sample of the dataset, type 'sample'.
If you'd like a brief description, type 'description'.
If you'd like to see some data analysis, type 'analytics'.
If you'd just like an overview of some interesting stuff we've discovered by analyzing our dataset, type 'tour'.
If you'd like to exit the application, type 'exit'.
";

const ANALYTICS_PROMPT: &str = "\
If you would like to see general descriptive statistics, write 'descriptive'.
If you'd like to count the number of values in a certain column, type 'count'.
If you'd like to calculate the min and max of a column, type 'min n max'.
If you'd like to see the types of graphs we can make with this data, type 'showcase'.
If you'd like to calculate the average of some column, type 'average'.
If you'd like to see where the top students come from, type 'top'.
Type 'exit' to exit the application.
";

const TOUR_TERM_PROMPT: &str = "\
Obviously, there's a lot of factors we can consider when looking at our dataset.
For this program, and this tour, we mainly focus on the effect of different factors on grades in each term.
Please choose which term you want to focus on for this tour, '1', '2', or '3'.
";

const TOUR_TERM_RETRY_PROMPT: &str =
    "Please choose which term you want to focus on for this tour, '1', '2', or '3'.\n";

const CONTINUE_PROMPT: &str = "\
You may now proceed to analyze more, or you can leave.
Type anything to continue with analysis.
Type 'exit' to leave the application.
";

const DISMISS_CHART_PROMPT: &str = "Press Enter when you are done viewing the chart.\n";

const LEAVING: &str = "You are leaving this application.";

/// One interactive session over a cleaned table. Holds the table and config
/// by shared reference; nothing in the loop mutates the data.
pub struct Session<'a, C: Console, B: ChartBackend> {
    table: &'a StudentTable,
    config: &'a AppConfig,
    console: C,
    backend: B,
    state: MenuState,
}

impl<'a, C: Console, B: ChartBackend> Session<'a, C, B> {
    pub fn new(table: &'a StudentTable, config: &'a AppConfig, console: C, backend: B) -> Self {
        Self {
            table,
            config,
            console,
            backend,
            state: MenuState::Main,
        }
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    /// Gives the console and backend back, for inspection after a run.
    pub fn into_parts(self) -> (C, B) {
        (self.console, self.backend)
    }

    /// Runs the loop until the session terminates.
    pub fn run(&mut self) -> Result<()> {
        while self.state != MenuState::Terminated {
            match self.state {
                MenuState::Main => self.main_step()?,
                MenuState::Analytics => self.analytics_step()?,
                MenuState::Tour => self.tour_step()?,
                MenuState::Terminated => break,
            }
        }
        Ok(())
    }

    /// Runs the action chosen on the command line, then enters the loop.
    pub fn run_startup(&mut self, action: StartupAction) -> Result<()> {
        match action {
            StartupAction::Exit => {
                self.console.print(LEAVING)?;
                self.state = MenuState::Terminated;
                return Ok(());
            }
            StartupAction::Sample => {
                self.show_sample()?;
                self.continue_or_exit()?;
            }
            StartupAction::Description => {
                self.console.print(&describe::describe(self.table))?;
                self.continue_or_exit()?;
            }
            StartupAction::Tour => self.state = MenuState::Tour,
            StartupAction::Analytics => {}
        }
        self.run()
    }

    fn main_step(&mut self) -> Result<()> {
        let Some(command) = self.console.prompt(MAIN_PROMPT)? else {
            self.state = MenuState::Terminated;
            return Ok(());
        };
        match command.as_str() {
            "sample" => self.show_sample()?,
            "description" => self.description_action()?,
            "tour" => self.state = MenuState::Tour,
            "analytics" => self.state = MenuState::Analytics,
            "exit" => {
                self.console.print(LEAVING)?;
                self.state = MenuState::Terminated;
            }
            other => self.report(&AnalysisError::InvalidCommand(other.to_string()))?,
        }
        Ok(())
    }

    fn analytics_step(&mut self) -> Result<()> {
        let Some(command) = self.console.prompt(ANALYTICS_PROMPT)? else {
            self.state = MenuState::Terminated;
            return Ok(());
        };
        match command.as_str() {
            "descriptive" => self.console.print(&describe::describe(self.table))?,
            "count" => self.count_action()?,
            "min n max" => self.min_max_action()?,
            "showcase" => self.showcase_action()?,
            "average" => self.average_action()?,
            "top" => self.top_action()?,
            "exit" => {
                self.console.print(LEAVING)?;
                self.state = MenuState::Terminated;
            }
            other => self.report(&AnalysisError::InvalidCommand(other.to_string()))?,
        }
        Ok(())
    }

    fn tour_step(&mut self) -> Result<()> {
        self.console
            .print("Welcome to the data tour! Happy seeing you here, nerds.")?;

        let mut prompt = TOUR_TERM_PROMPT;
        let term = loop {
            let Some(answer) = self.console.prompt(prompt)? else {
                self.state = MenuState::Terminated;
                return Ok(());
            };
            if tour::TERMS.contains(&answer.as_str()) {
                break answer;
            }
            self.console
                .print("There are only 3 terms.\nPlease try choosing again.")?;
            prompt = TOUR_TERM_RETRY_PROMPT;
        };

        match tour::specs_for_term(self.table, &term) {
            Ok(specs) => {
                for spec in specs {
                    if self.state == MenuState::Terminated {
                        return Ok(());
                    }
                    let spec = self.sized(spec);
                    self.show_chart(&spec, self.table)?;
                }
                self.console
                    .print("And that concludes this little tour!\nHappy exploring!")?;
            }
            Err(e) => {
                self.report(&e)?;
                self.state = MenuState::Main;
                return Ok(());
            }
        }

        self.continue_or_exit()
    }

    fn continue_or_exit(&mut self) -> Result<()> {
        if self.state == MenuState::Terminated {
            return Ok(());
        }
        match self.console.prompt(CONTINUE_PROMPT)? {
            None => self.state = MenuState::Terminated,
            Some(answer) if answer == "exit" => {
                self.console.print(LEAVING)?;
                self.state = MenuState::Terminated;
            }
            Some(_) => self.state = MenuState::Main,
        }
        Ok(())
    }

    fn show_sample(&mut self) -> Result<()> {
        match sample::sample(self.table, self.config.analysis.sample_rows) {
            Ok(df) => self.console.print(&format!("{}", df))?,
            Err(e) => self.report_failure(&e)?,
        }
        Ok(())
    }

    fn description_action(&mut self) -> Result<()> {
        self.console.print(&describe::describe(self.table))?;
        self.print_column_list(
            "These are the columns of the dataset:",
            self.table.column_names().iter().map(|s| s.to_string()),
        )?;
        let Some(answer) = self.console.prompt(
            "If you'd like to see the distribution of values for any column, write the name of the column.\n\
             Type anything else to go back to the main menu.\n\
             Type 'exit' to exit the application.\n",
        )?
        else {
            self.state = MenuState::Terminated;
            return Ok(());
        };
        if answer == "exit" {
            self.console.print(LEAVING)?;
            self.state = MenuState::Terminated;
            return Ok(());
        }
        match describe::distribution(self.table, &answer) {
            Ok(dist) => self.print_distribution(&answer, &dist)?,
            Err(_) => self.console.print(
                "That was not a valid column name or the word 'exit'.\nTaking you back to the main menu.",
            )?,
        }
        Ok(())
    }

    fn count_action(&mut self) -> Result<()> {
        self.print_column_list(
            "These are the columns available for value counting:",
            self.table.column_names().iter().map(|s| s.to_string()),
        )?;
        let Some(column) = self
            .console
            .prompt("Enter the name of a column to count its unique values:\n")?
        else {
            self.state = MenuState::Terminated;
            return Ok(());
        };
        match describe::distribution(self.table, &column) {
            Ok(dist) => self.print_distribution(&column, &dist)?,
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    fn min_max_action(&mut self) -> Result<()> {
        self.print_column_list(
            "These are the numeric columns in the dataset you can calculate min/maxes for:",
            self.table
                .numeric_columns()
                .iter()
                .map(|c| c.name().to_string()),
        )?;
        let Some(column) = self.console.prompt(
            "Enter the name of the numeric column to calculate the minimum and maximum:\n",
        )?
        else {
            self.state = MenuState::Terminated;
            return Ok(());
        };
        match stats::min_max(self.table, &column) {
            Ok((min, max)) => self.console.print(&format!(
                "Minimum of '{}': {}\nMaximum of '{}': {}",
                column, min, column, max
            ))?,
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    fn average_action(&mut self) -> Result<()> {
        self.print_column_list(
            "These are the numeric columns you can calculate an average for:",
            self.table
                .numeric_columns()
                .iter()
                .map(|c| c.name().to_string()),
        )?;
        let Some(column) = self
            .console
            .prompt("Enter the name of the column you want to calculate the average for.\n")?
        else {
            self.state = MenuState::Terminated;
            return Ok(());
        };
        match stats::average(self.table, &column) {
            Ok(mean) => self
                .console
                .print(&format!("The average for {} is: {}.", column, mean))?,
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    fn showcase_action(&mut self) -> Result<()> {
        match chart::showcase(self.table) {
            Ok(specs) => {
                self.console.print(
                    "These are all the types of graphs this program is capable of making with this dataset.",
                )?;
                for spec in specs {
                    if self.state == MenuState::Terminated {
                        return Ok(());
                    }
                    let spec = self.sized(spec);
                    self.show_chart(&spec, self.table)?;
                }
            }
            Err(_) => self.console.print(
                "Sorry, we don't have enough data within this particular dataset to showcase our graph options.",
            )?,
        }
        Ok(())
    }

    fn top_action(&mut self) -> Result<()> {
        self.print_column_list(
            "These are the categorical columns you can view top students by:",
            self.table
                .categorical_columns()
                .iter()
                .map(|c| c.name().to_string()),
        )?;
        let Some(column) = self
            .console
            .prompt("Please choose one of the categorical columns.\n")?
        else {
            self.state = MenuState::Terminated;
            return Ok(());
        };
        if self.table.kind_of(&column) != Some(ColumnKind::Categorical) {
            self.console.print(&format!(
                "The column {} isn't a categorical column of this dataset.\nTaking you back to the menu.",
                column
            ))?;
            return Ok(());
        }

        let grade = self.config.analysis.top_grade_column.clone();
        let grade_ref = match self.table.require_numeric(&grade) {
            Ok(r) => r,
            Err(e) => {
                self.report(&e)?;
                return Ok(());
            }
        };
        let threshold = match stats::quantile(self.table, &grade, 0.75) {
            Ok(t) => t,
            Err(e) => {
                self.report(&e)?;
                return Ok(());
            }
        };

        let top_students = match self.table.filter_at_least(&grade_ref, threshold) {
            Ok(table) => table,
            Err(e) => {
                self.report_failure(&e)?;
                return Ok(());
            }
        };
        match chart::pie_chart(
            &top_students,
            &column,
            &format!("Top Students Distribution in {}", column),
        ) {
            Ok(spec) => {
                let spec = self.sized(spec);
                self.show_chart(&spec, &top_students)?;
            }
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    /// Applies the configured figure size to a freshly built spec.
    fn sized(&self, spec: ChartSpec) -> ChartSpec {
        let (width, height) = self.config.charts.figure_size();
        spec.with_size(width, height)
    }

    /// Renders one chart and blocks until the user dismisses it. Rendering
    /// failures are reported and the session stays in its state.
    fn show_chart(&mut self, spec: &ChartSpec, table: &StudentTable) -> Result<()> {
        match self.backend.show(spec, table) {
            Ok(path) => {
                self.console
                    .print(&format!("Chart written to {}", path.display()))?;
                if self.console.prompt(DISMISS_CHART_PROMPT)?.is_none() {
                    self.state = MenuState::Terminated;
                }
            }
            Err(e) => {
                tracing::warn!(chart = spec.kind.as_str(), error = %e, "chart rendering failed");
                self.console
                    .print(&format!("Could not draw the chart: {}", e))?;
            }
        }
        Ok(())
    }

    fn print_column_list(
        &mut self,
        header: &str,
        names: impl Iterator<Item = String>,
    ) -> Result<()> {
        self.console.print(header)?;
        let names: Vec<String> = names.collect();
        for name in names {
            self.console.print(&name)?;
        }
        Ok(())
    }

    fn print_distribution(&mut self, column: &str, dist: &[(String, usize)]) -> Result<()> {
        self.console
            .print(&format!("These are the value counts for {}:", column))?;
        let lines: Vec<String> = dist
            .iter()
            .map(|(value, count)| format!("  {:<12} {}", value, count))
            .collect();
        for line in lines {
            self.console.print(&line)?;
        }
        Ok(())
    }

    fn report(&mut self, error: &AnalysisError) -> Result<()> {
        tracing::debug!(%error, "recovered analysis error");
        self.console.print(&format!("{}", error))
    }

    fn report_failure(&mut self, error: &color_eyre::Report) -> Result<()> {
        tracing::warn!(%error, "recovered failure");
        self.console.print(&format!("{}", error))
    }
}
