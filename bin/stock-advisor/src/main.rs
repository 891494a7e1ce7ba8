use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use advisor::{Desk, InstrumentFileConfig, Outcome, Report};
use common::{Config, Locale};
use feed::{JsonDirFeed, SnapshotCache};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let json = std::env::args().skip(1).any(|a| a == "--json");

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env();
    info!(
        instruments = %cfg.instruments_path,
        data_dir = %cfg.data_dir,
        locale = %cfg.locale,
        "Stock advisor starting"
    );

    let instruments = InstrumentFileConfig::load(&cfg.instruments_path)
        .with_context(|| format!("loading {}", cfg.instruments_path))?;
    if instruments.instruments.is_empty() {
        info!("No instruments configured, nothing to do");
        return Ok(());
    }

    // ── Provider ──────────────────────────────────────────────────────────────
    let provider = SnapshotCache::new(JsonDirFeed::new(&cfg.data_dir)).with_ttl(cfg.snapshot_ttl);

    // ── Desk ──────────────────────────────────────────────────────────────────
    let desk = Desk::new(Arc::new(provider), instruments.instruments)
        .with_request_interval(cfg.request_interval);
    let reports = desk.run().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print_table(&reports, cfg.locale);
    }
    Ok(())
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn print_table(reports: &[Report], locale: Locale) {
    let headers = match locale {
        Locale::Zh => ["代码", "名称", "价格", "涨跌幅", "建议", "置信度", "更新时间"],
        Locale::En => ["code", "name", "price", "change", "advice", "confidence", "updated"],
    };
    println!("{}", headers.join("\t"));
    for r in reports {
        println!("{}", format_row(r, locale));
    }
}

fn format_row(r: &Report, locale: Locale) -> String {
    let price = r.price.map_or_else(|| "-".to_string(), |p| format!("{p:.2}"));
    let change = r
        .change_pct
        .map_or_else(|| "-".to_string(), |c| format!("{c:+.2}%"));
    // The failure reason is already in the logs.
    let (advice, confidence) = match &r.outcome {
        Outcome::Evaluated(eval) => (
            eval.advice.render(locale),
            format!("{:.2}%", eval.confidence),
        ),
        Outcome::Failed { .. } => {
            let label = match locale {
                Locale::Zh => "数据获取失败",
                Locale::En => "data fetch failed",
            };
            (label.to_string(), "-".to_string())
        }
    };
    [
        r.code.clone(),
        r.name.clone(),
        price,
        change,
        advice,
        confidence,
        r.updated_at.format(TIMESTAMP_FORMAT).to_string(),
    ]
    .join("\t")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use common::Quote;

    fn report(outcome: Outcome) -> Report {
        Report {
            code: "600000".into(),
            name: "浦发银行".into(),
            price: Some(7.9),
            change_pct: Some(-0.4),
            outcome,
            updated_at: Local.with_ymd_and_hms(2024, 3, 8, 15, 0, 5).unwrap(),
        }
    }

    #[test]
    fn failed_row_is_localized() {
        let failed = report(Outcome::Failed {
            reason: "Not found: no history".into(),
        });
        let zh = format_row(&failed, Locale::Zh);
        assert!(zh.contains("数据获取失败"), "{zh}");
        assert!(!zh.contains("Not found"), "{zh}");
        assert!(format_row(&failed, Locale::En).contains("data fetch failed"));
    }

    #[test]
    fn row_carries_full_timestamp() {
        let eval = advisor::advise(&Quote::new(7.9, -0.4), None);
        let row = format_row(&report(Outcome::Evaluated(eval)), Locale::Zh);
        assert_eq!(
            row,
            "600000\t浦发银行\t7.90\t-0.40%\t继续持有 (仅涨跌幅)\t35.00%\t2024-03-08 15:00:05"
        );
    }
}
