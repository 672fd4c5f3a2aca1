//! Analysis pipeline — orchestrates one `/analyze` request.
//!
//! Flow: validate birth → BaZi → Zi Wei → Zhou Yi cast → interpret →
//!       render PDF → return readings plus report URL.

use chrono::{Duration, NaiveDateTime, Utc};
use tracing::info;

use crate::analysis::interpreter::Interpreter;
use crate::analysis::models::{AnalyzeRequest, AnalyzeResponse, Charts, Interpretation};
use crate::divination::bazi::analyze_bazi;
use crate::divination::zhouyi::{cast_by_coins, cast_by_time, CastMethod, Casting};
use crate::divination::ziwei::generate_ziwei_chart;
use crate::divination::BirthMoment;
use crate::errors::AppError;
use crate::report::{ReportContent, ReportSection, ReportWriter};

/// China Standard Time, UTC+8, no daylight saving.
const CHINA_UTC_OFFSET_HOURS: i64 = 8;

/// Current wall-clock time in China, used for time-based casting.
pub fn china_now() -> NaiveDateTime {
    (Utc::now() + Duration::hours(CHINA_UTC_OFFSET_HOURS)).naive_utc()
}

/// Runs the full pipeline for a request at the current China time.
pub async fn run_analysis(
    interpreter: &dyn Interpreter,
    reports: &ReportWriter,
    public_base_url: &str,
    request: AnalyzeRequest,
) -> Result<AnalyzeResponse, AppError> {
    run_analysis_at(interpreter, reports, public_base_url, request, china_now()).await
}

/// Runs the pipeline with one fixed `now`, shared by time casting and the report timestamp.
pub async fn run_analysis_at(
    interpreter: &dyn Interpreter,
    reports: &ReportWriter,
    public_base_url: &str,
    request: AnalyzeRequest,
    now: NaiveDateTime,
) -> Result<AnalyzeResponse, AppError> {
    let birth = &request.birth;

    // Step 1: Validate
    let moment = BirthMoment::new(birth.year, birth.month, birth.day, birth.hour, birth.gender)?;

    // Step 2: Charts
    let charts = compute_charts(&moment, request.divination.method, now)?;
    info!(
        "Charts computed: bazi={} life_palace={} hexagram={}",
        charts.bazi.eight_characters(),
        charts.ziwei.life_palace.name(),
        charts.zhouyi.primary.full_name
    );

    // Step 3: Interpret
    let question = request.divination.question.as_deref();
    let interpretation = interpreter.interpret(&charts, question).await?;

    // Step 4: Report
    let content = build_report_content(&moment, &charts, &interpretation, question, now);
    let stored = reports
        .write(content)
        .await
        .map_err(|e| AppError::Report(format!("{e:#}")))?;

    let pdf_report = format!("{}/reports/{}", public_base_url, stored.file_name);
    info!(
        "Analysis complete, report {} served at {pdf_report}",
        stored.path.display()
    );

    Ok(AnalyzeResponse {
        bazi: interpretation.bazi,
        ziwei: interpretation.ziwei,
        zhouyi: interpretation.zhouyi,
        pdf_report,
        charts,
    })
}

/// Computes all three charts. `now` is only used by time-based casting.
pub fn compute_charts(
    moment: &BirthMoment,
    method: CastMethod,
    now: NaiveDateTime,
) -> Result<Charts, AppError> {
    let bazi = analyze_bazi(moment);
    let ziwei = generate_ziwei_chart(moment)?;
    let zhouyi = cast(method, now)?;
    Ok(Charts {
        bazi,
        ziwei,
        zhouyi,
    })
}

fn cast(method: CastMethod, now: NaiveDateTime) -> Result<Casting, AppError> {
    match method {
        CastMethod::Time => Ok(cast_by_time(now)?),
        CastMethod::Random => Ok(cast_by_coins(&mut rand::rng())),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Report content
// ────────────────────────────────────────────────────────────────────────────

/// Assembles the printed report: chart summaries followed by the readings.
pub fn build_report_content(
    moment: &BirthMoment,
    charts: &Charts,
    interpretation: &Interpretation,
    question: Option<&str>,
    generated_at: NaiveDateTime,
) -> ReportContent {
    let question = question.map(str::trim).filter(|q| !q.is_empty());
    let generated = generated_at.format("%Y-%m-%d %H:%M");
    let born = moment.datetime.format("%Y-%m-%d %H:00");
    let bazi = &charts.bazi;
    let ziwei = &charts.ziwei;
    let zhouyi = &charts.zhouyi;

    let stars = if ziwei.main_stars.is_empty() {
        "无".to_string()
    } else {
        ziwei
            .main_stars
            .iter()
            .map(|s| s.name())
            .collect::<Vec<_>>()
            .join("、")
    };

    let mut cast_summary = String::new();
    if let Some(q) = question {
        cast_summary.push_str(&format!("所问：{q}\n"));
    }
    cast_summary.push_str(&format!(
        "{}\n卦辞：{}",
        zhouyi.headline(),
        zhouyi.primary.judgment
    ));

    ReportContent {
        title: "玄学综合分析报告".to_string(),
        subtitle: format!(
            "公历 {born}　农历 {}　{}　生成于 {generated}",
            ziwei.lunar_display,
            moment.gender.name()
        ),
        sections: vec![
            ReportSection {
                heading: "一、八字分析".to_string(),
                body: format!(
                    "四柱：{}　日主：{}（{}）　格局：{}　喜用：{}\n\n{}",
                    bazi.eight_characters(),
                    bazi.day_master.name(),
                    bazi.day_master_element.name(),
                    bazi.pattern,
                    bazi.favourable_element.name(),
                    interpretation.bazi
                ),
            },
            ReportSection {
                heading: "二、紫微斗数".to_string(),
                body: format!(
                    "命宫：{}　身宫：{}（{}）　{}　主星：{}\n\n{}",
                    ziwei.life_palace.name(),
                    ziwei.body_palace.name(),
                    ziwei.body_palace_name,
                    ziwei.bureau.name,
                    stars,
                    interpretation.ziwei
                ),
            },
            ReportSection {
                heading: "三、周易卜卦".to_string(),
                body: format!("{cast_summary}\n\n{}", interpretation.zhouyi),
            },
        ],
    }
}
