mod common;

use color_eyre::Result;
use common::{RecordingBackend, ScriptedConsole};
use studex::chart::ChartKind;
use studex::config::AppConfig;
use studex::menu::{MenuState, Session};
use studex::StartupAction;

fn session_over<'a>(
    table: &'a studex::StudentTable,
    config: &'a AppConfig,
    answers: &[&str],
) -> Session<'a, ScriptedConsole, RecordingBackend> {
    Session::new(
        table,
        config,
        ScriptedConsole::new(answers),
        RecordingBackend::new(),
    )
}

#[test]
fn analytics_then_exit_terminates_without_touching_the_data() -> Result<()> {
    let table = common::student_table();
    let before = table.dataframe().clone();
    let config = AppConfig::default();

    let mut session = session_over(&table, &config, &["analytics", "exit"]);
    session.run()?;

    assert_eq!(session.state(), MenuState::Terminated);
    assert!(table.dataframe().equals_missing(&before));
    Ok(())
}

#[test]
fn invalid_commands_keep_the_current_state() -> Result<()> {
    let table = common::student_table();
    let config = AppConfig::default();

    // two garbage commands in Main, then a garbage command in Analytics;
    // the script then runs out, which terminates the session
    let mut session = session_over(&table, &config, &["blorp", "??", "analytics", "nope"]);
    session.run()?;

    let (console, _) = session.into_parts();
    let printed = console.printed();
    assert!(printed.contains("'blorp' is not a valid request"));
    assert!(printed.contains("'nope' is not a valid request"));
    Ok(())
}

#[test]
fn unknown_distribution_column_is_recovered() -> Result<()> {
    let table = common::student_table();
    let config = AppConfig::default();

    // description offers a column lookup; a bad name is a no-op back to Main,
    // where 'exit' then terminates
    let mut session = session_over(&table, &config, &["description", "nonexistent", "exit"]);
    session.run()?;

    assert_eq!(session.state(), MenuState::Terminated);
    let (console, _) = session.into_parts();
    assert!(console.printed().contains("not a valid column name"));
    Ok(())
}

#[test]
fn sample_prints_the_configured_number_of_rows() -> Result<()> {
    let table = common::student_table();
    let mut config = AppConfig::default();
    config.analysis.sample_rows = 3;

    let mut session = session_over(&table, &config, &["sample", "exit"]);
    session.run()?;

    let (console, _) = session.into_parts();
    // polars prints the shape header for the sampled frame
    assert!(console.printed().contains("shape: (3, 8)"));
    Ok(())
}

#[test]
fn count_action_lists_candidates_and_prints_the_distribution() -> Result<()> {
    let table = common::student_table();
    let config = AppConfig::default();

    let mut session = session_over(&table, &config, &["analytics", "count", "school", "exit"]);
    session.run()?;

    let (console, _) = session.into_parts();
    let printed = console.printed();
    // candidates re-displayed before the prompt
    assert!(printed.contains("available for value counting"));
    assert!(printed.contains("G3"));
    assert!(printed.contains("These are the value counts for school:"));
    Ok(())
}

#[test]
fn min_max_and_average_flow_through_analytics() -> Result<()> {
    let table = common::student_table();
    let config = AppConfig::default();

    let mut session = session_over(
        &table,
        &config,
        &["analytics", "min n max", "G1", "average", "school", "exit"],
    );
    session.run()?;

    assert_eq!(session.state(), MenuState::Terminated);
    let (console, _) = session.into_parts();
    let printed = console.printed();
    assert!(printed.contains("Minimum of 'G1': 6"));
    assert!(printed.contains("Maximum of 'G1': 15"));
    // non-numeric column is reported, session stayed alive through it
    assert!(printed.contains("'school' is not a numeric column"));
    Ok(())
}

#[test]
fn showcase_renders_the_trio_with_dismissal_prompts() -> Result<()> {
    let table = common::student_table();
    let config = AppConfig::default();

    let mut session = session_over(
        &table,
        &config,
        &["analytics", "showcase", "", "", "", "exit"],
    );
    session.run()?;

    let (_, backend) = session.into_parts();
    let rendered = backend.rendered();
    assert_eq!(rendered.len(), 3);
    assert_eq!(rendered[0].kind, ChartKind::Box);
    assert_eq!(rendered[1].kind, ChartKind::Scatter);
    assert_eq!(rendered[2].kind, ChartKind::Violin);
    Ok(())
}

#[test]
fn configured_figure_size_reaches_every_rendered_chart() -> Result<()> {
    let table = common::student_table();
    let mut config = AppConfig::default();
    config.charts.figure_width = 20.0;
    config.charts.figure_height = 12.0;

    let mut session = session_over(
        &table,
        &config,
        &["analytics", "showcase", "", "", "", "top", "sex", "", "exit"],
    );
    session.run()?;

    let (_, backend) = session.into_parts();
    let rendered = backend.rendered();
    assert_eq!(rendered.len(), 4);
    assert!(rendered
        .iter()
        .all(|spec| (spec.width, spec.height) == (20.0, 12.0)));
    Ok(())
}

#[test]
fn tour_reprompts_on_invalid_terms_and_renders_five_boxes() -> Result<()> {
    let table = common::student_table();
    let config = AppConfig::default();

    // "4" and "one" are re-prompted; then term 2 runs the five charts, each
    // dismissed by an empty line, and "exit" answers the continue prompt
    let mut session = session_over(
        &table,
        &config,
        &["tour", "4", "one", "2", "", "", "", "", "", "exit"],
    );
    session.run()?;

    assert_eq!(session.state(), MenuState::Terminated);
    let (console, backend) = session.into_parts();
    assert!(console.printed().contains("There are only 3 terms."));
    let rendered = backend.rendered();
    assert_eq!(rendered.len(), 5);
    assert!(rendered.iter().all(|s| s.kind == ChartKind::Box));
    assert!(rendered.iter().all(|s| s.y.as_deref() == Some("G2")));
    Ok(())
}

#[test]
fn tour_without_the_grade_column_renders_nothing() -> Result<()> {
    let df = polars::df!(
        "Medu" => &[1i64, 2],
        "sex" => &["F", "M"],
    )?;
    let table = studex::StudentTable::from_dataframe(df);
    let config = AppConfig::default();

    let mut session = session_over(&table, &config, &["tour", "1", "exit"]);
    session.run()?;

    assert_eq!(session.state(), MenuState::Terminated);
    let (console, backend) = session.into_parts();
    assert!(backend.rendered().is_empty());
    assert!(console
        .printed()
        .contains("the tour target column 'G1' is missing"));
    Ok(())
}

#[test]
fn top_action_validates_the_configured_grade_column() -> Result<()> {
    let table = common::student_table();
    let mut config = AppConfig::default();
    config.analysis.top_grade_column = "final_score".to_string();

    let mut session = session_over(&table, &config, &["analytics", "top", "school", "exit"]);
    session.run()?;

    assert_eq!(session.state(), MenuState::Terminated);
    let (console, backend) = session.into_parts();
    assert!(backend.rendered().is_empty());
    assert!(console
        .printed()
        .contains("'final_score' is not a numeric column"));
    Ok(())
}

#[test]
fn top_action_draws_a_pie_over_the_top_quartile() -> Result<()> {
    let table = common::student_table();
    let config = AppConfig::default();

    let mut session = session_over(&table, &config, &["analytics", "top", "sex", "", "exit"]);
    session.run()?;

    let (_, backend) = session.into_parts();
    let rendered = backend.rendered();
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0].kind, ChartKind::Pie);
    assert_eq!(rendered[0].x, "sex");
    assert!(rendered[0].title.contains("Top Students"));
    Ok(())
}

#[test]
fn startup_description_then_continue_enters_the_main_loop() -> Result<()> {
    let table = common::student_table();
    let config = AppConfig::default();

    let mut session = session_over(&table, &config, &["anything", "exit"]);
    session.run_startup(StartupAction::Description)?;

    assert_eq!(session.state(), MenuState::Terminated);
    let (console, _) = session.into_parts();
    assert!(console.printed().contains("12 rows and 8 columns"));
    Ok(())
}

#[test]
fn closed_input_terminates_cleanly() -> Result<()> {
    let table = common::student_table();
    let config = AppConfig::default();

    let mut session = session_over(&table, &config, &[]);
    session.run()?;
    assert_eq!(session.state(), MenuState::Terminated);
    Ok(())
}
