//! CSV report adapter: writes the tick history for downstream charting.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::error::GameError;
use crate::domain::session::SessionResult;
use crate::ports::report_port::ReportPort;

pub struct CsvReportAdapter;

fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.6}")).unwrap_or_default()
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, result: &SessionResult, output_dir: &Path) -> Result<PathBuf, GameError> {
        fs::create_dir_all(output_dir)?;
        let filename = format!(
            "ticks_{}.csv",
            result.start_time.format("%Y%m%d_%H%M%S")
        );
        let path = output_dir.join(filename);

        let mut writer = csv::Writer::from_path(&path).map_err(|e| GameError::Report {
            reason: format!("failed to open {}: {}", path.display(), e),
        })?;

        writer
            .write_record([
                "timestamp",
                "price",
                "ma_short",
                "ma_long",
                "rsi",
                "macd_line",
                "macd_signal",
                "bollinger_upper",
                "bollinger_middle",
                "bollinger_lower",
                "stochastic_k",
                "stochastic_d",
                "signal",
                "cash",
                "quantity",
                "avg_entry_price",
                "realized_pnl",
                "unrealized_pnl",
                "fees_accrued",
                "equity",
            ])
            .map_err(|e| GameError::Report {
                reason: format!("CSV write error: {}", e),
            })?;

        for tick in &result.ticks {
            let snapshot = &tick.snapshot;
            let state = &tick.state;
            writer
                .write_record([
                    tick.sample.timestamp.to_rfc3339(),
                    format!("{:.6}", tick.sample.price),
                    fmt_opt(snapshot.ma_short),
                    fmt_opt(snapshot.ma_long),
                    fmt_opt(snapshot.rsi),
                    fmt_opt(snapshot.macd_line),
                    fmt_opt(snapshot.macd_signal),
                    fmt_opt(snapshot.bollinger_upper),
                    fmt_opt(snapshot.bollinger_middle),
                    fmt_opt(snapshot.bollinger_lower),
                    fmt_opt(snapshot.stochastic_k),
                    fmt_opt(snapshot.stochastic_d),
                    tick.signal.label().to_string(),
                    format!("{:.6}", state.cash),
                    format!("{:.8}", state.position.quantity),
                    format!("{:.6}", state.position.avg_entry_price),
                    format!("{:.6}", state.realized_pnl),
                    format!("{:.6}", state.unrealized_pnl),
                    format!("{:.6}", state.fees_accrued),
                    format!("{:.6}", state.equity),
                ])
                .map_err(|e| GameError::Report {
                    reason: format!("CSV write error: {}", e),
                })?;
        }

        writer.flush()?;
        Ok(path)
    }
}
