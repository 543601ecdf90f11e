use color_eyre::Result;
use log::LevelFilter;
use ratatui::style::{Color, Style, Stylize};
use ratatui::widgets::{Block, Borders};
use tui_logger::{TuiLoggerLevelOutput, TuiLoggerWidget};

/// Routes the `log` facade into tui-logger so the run can be watched
/// in the log pane. Library code only emits records.
pub fn setup_logging() -> Result<()> {
    tui_logger::init_logger(LevelFilter::Trace)?;
    tui_logger::set_default_level(LevelFilter::Info);

    log::info!("Rover logger initialized");
    Ok(())
}

pub fn create_log_widget<'a>() -> TuiLoggerWidget<'a> {
    TuiLoggerWidget::default()
        .block(
            Block::default()
                .title("Logs")
                .border_style(Style::default().fg(Color::White))
                .borders(Borders::ALL),
        )
        .output_separator('|')
        .output_timestamp(Some("%H:%M:%S".to_string()))
        .output_level(Some(TuiLoggerLevelOutput::Abbreviated))
        .output_target(false)
        .output_file(false)
        .output_line(false)
        .style_error(Style::default().fg(Color::Red).bold())
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Green))
        .style_debug(Style::default().fg(Color::Blue))
        .style_trace(Style::default().fg(Color::Gray))
}
