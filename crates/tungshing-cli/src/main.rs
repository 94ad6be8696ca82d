//! TungShing command-line interface.
//!
//! ```sh
//! tungshing                                        # now
//! tungshing --datetime 2025-02-03T22:11:00+08:00
//! tungshing --datetime 2025-02-03T22:11:00 --tz Asia/Shanghai
//! tungshing --tz UTC --rule-tz Asia/Hong_Kong --json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use flexi_logger::{Logger, LoggerHandle};
use log::debug;
use std::fmt::Write as _;
use std::process::ExitCode;
use tungshing::prelude::*;

const RULE: &str = "============================================================";

#[derive(Debug, Parser)]
#[command(
    name = "tungshing",
    version,
    about = "TungShing - 严格口径的黄历/通胜\nStrict Chinese almanac: year at Lichun, month at Jie, day at 23:00",
    after_help = "Examples:\n  tungshing\n  tungshing --datetime 2025-02-03T22:11:00+08:00\n  tungshing --datetime 2025-02-03T22:11:00 --tz Asia/Shanghai\n  tungshing --tz UTC --rule-tz Asia/Hong_Kong"
)]
struct Cli {
    /// ISO-8601 date or datetime; without an offset it is read in --tz. Defaults to now.
    #[arg(long, visible_alias = "dt", value_name = "DATETIME")]
    datetime: Option<String>,

    /// Display timezone: an IANA name or an alias such as `beijing` or `utc`.
    #[arg(long, value_name = "TIMEZONE", default_value = "Asia/Shanghai")]
    tz: String,

    /// Timezone that decides the 23:00 day boundary.
    #[arg(long = "rule-tz", value_name = "TIMEZONE", default_value = "Asia/Shanghai")]
    rule_tz: String,

    /// Character set of the lunar names.
    #[arg(long, value_enum, default_value_t = ScriptArg::Simplified)]
    script: ScriptArg,

    /// Year-pillar convention of the legacy calendar fields.
    #[arg(long, value_enum, default_value_t = YearPillarArg::LunarNewYear)]
    legacy_year_pillar: YearPillarArg,

    /// Print the snapshot as JSON.
    #[arg(long)]
    json: bool,

    /// Log filter, e.g. `debug` or `tungshing_rules=trace`. Falls back to RUST_LOG.
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ScriptArg {
    Simplified,
    Traditional,
}

impl From<ScriptArg> for Script {
    fn from(arg: ScriptArg) -> Self {
        match arg {
            ScriptArg::Simplified => Script::Simplified,
            ScriptArg::Traditional => Script::Traditional,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum YearPillarArg {
    LunarNewYear,
    BeginningOfSpring,
}

impl From<YearPillarArg> for YearPillarMode {
    fn from(arg: YearPillarArg) -> Self {
        match arg {
            YearPillarArg::LunarNewYear => YearPillarMode::LunarNewYear,
            YearPillarArg::BeginningOfSpring => YearPillarMode::BeginningOfSpring,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _logger = match init_logging(cli.log_level.as_deref()) {
        Ok(handle) => handle,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            return ExitCode::FAILURE;
        }
    };

    match run(&cli) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

/// Logs to stderr; stdout carries only the result.
fn init_logging(level: Option<&str>) -> Result<LoggerHandle> {
    let logger = match level {
        Some(filter) => Logger::try_with_str(filter).with_context(|| format!("invalid log level `{}`", filter))?,
        None => Logger::try_with_env_or_str("warn").context("invalid RUST_LOG")?,
    };
    logger
        .log_to_stderr()
        .format(flexi_logger::default_format)
        .start()
        .context("failed to start logger")
}

fn run(cli: &Cli) -> Result<String> {
    let options = LunisolarOptions::new()
        .script(cli.script.into())
        .year_pillar(cli.legacy_year_pillar.into());
    let ctx = QueryContextBuilder::new()
        .display_tz(&cli.tz)
        .rule_tz(&cli.rule_tz)
        .options(options)
        .build()?;

    let moment = cli
        .datetime
        .as_deref()
        .map(tungshing::parse_moment)
        .transpose()?;
    debug!("query {:?} with {:?}", moment, ctx);

    let snapshot = Almanac::shared().query(moment, &ctx)?;

    if cli.json {
        let mut json = serde_json::to_string_pretty(&snapshot)?;
        json.push('\n');
        Ok(json)
    } else {
        Ok(render(&snapshot, cli.script.into())?)
    }
}

fn render(t: &TungShing, script: Script) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{}", RULE)?;
    writeln!(out, "TungShing - 严格口径黄历 | Strict Lunar Calendar")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Reference time: {}", t.date())?;
    writeln!(out, "Timezone: {} | Rule timezone: {}", t.display_tz(), t.rule_tz())?;
    if t.is_late_zi_hour() {
        writeln!(out, "夜子时 | Late Zi hour: day fields read at {}", t.resolved_date())?;
    }
    writeln!(out)?;

    writeln!(out, "四柱八字 | Four Pillars (Bazi):")?;
    writeln!(out, "  年柱 Year:   {}", t.year8_char())?;
    writeln!(out, "  月柱 Month:  {}", t.month8_char())?;
    writeln!(out, "  日柱 Day:    {}", t.day8_char())?;
    writeln!(out, "  时柱 Hour:   {}", t.twohour8_char())?;
    writeln!(out)?;

    writeln!(out, "农历信息 | Lunar Calendar:")?;
    writeln!(
        out,
        "  农历日期: {}年 {}{}月 {}日",
        t.lunar_year(),
        if t.is_lunar_leap_month() { "闰" } else { "" },
        t.lunar_month(),
        t.lunar_day()
    )?;
    writeln!(
        out,
        "  中文表示: {}年 {} {}",
        t.lunar_year_cn(),
        t.lunar_month_cn(),
        t.lunar_day_cn()
    )?;
    writeln!(out)?;

    match (t.term_today(), t.term_today_exact_rule_tz(), t.term_today_exact_cn8()) {
        (Some(term), Some(rule_tz), Some(cn8)) => {
            writeln!(out, "今日节气 | Solar Term Today: {}", term.name(script))?;
            writeln!(out, "  规则时区: {}", rule_tz)?;
            writeln!(out, "  北京时间: {}", cn8)?;
        }
        _ => writeln!(out, "今日无节气 | No solar term today")?,
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let cli = Cli::try_parse_from([
            "tungshing",
            "--datetime",
            "2025-02-03T22:11:00+08:00",
            "--rule-tz",
            "Europe/London",
            "--script",
            "traditional",
            "--legacy-year-pillar",
            "beginning-of-spring",
            "--json",
        ])
        .unwrap();
        assert_eq!(Some("2025-02-03T22:11:00+08:00"), cli.datetime.as_deref());
        assert_eq!("Asia/Shanghai", cli.tz);
        assert_eq!("Europe/London", cli.rule_tz);
        assert_eq!(ScriptArg::Traditional, cli.script);
        assert_eq!(YearPillarArg::BeginningOfSpring, cli.legacy_year_pillar);
        assert!(cli.json);
    }

    #[test]
    fn test_dt_alias() {
        let cli = Cli::try_parse_from(["tungshing", "--dt", "2025-02-03", "--tz", "beijing"]).unwrap();
        assert_eq!(Some("2025-02-03"), cli.datetime.as_deref());
        assert_eq!("beijing", cli.tz);
    }

    #[test]
    fn test_render_late_zi_hour() {
        let moment = tungshing::parse_moment("2025-02-03T23:05:00+08:00").unwrap();
        let t = Almanac::shared().query(Some(moment), &QueryContext::default()).unwrap();
        let out = render(&t, Script::Simplified).unwrap();
        assert!(out.contains("  年柱 Year:   乙巳"), "{}", out);
        assert!(out.contains("  日柱 Day:    甲辰"), "{}", out);
        assert!(out.contains("农历日期: 2025年 1月 7日"), "{}", out);
        assert!(out.contains("中文表示: 二〇二五年 正月 初七"), "{}", out);
        assert!(out.contains("Late Zi hour"), "{}", out);
        assert!(out.contains("今日节气 | Solar Term Today: 立春"), "{}", out);
    }
}
