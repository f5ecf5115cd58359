use axum::response::Html;

use crate::dashboard::feedback::{filter_feedback, FeedbackFilter};
use crate::dashboard::orchestrator::DashboardState;
use crate::models::analysis::FitScoreResult;
use crate::views::{escape_html, page};

pub const NO_FEEDBACK_MESSAGE: &str = "No feedback found";
pub const NO_RESUME_MESSAGE: &str = "No resume available to display.";

fn resume_preview(has_resume: bool) -> String {
    if has_resume {
        r#"<iframe class="resume-preview" src="/dashboard/resume" title="Resume preview" width="100%" height="600"></iframe>"#
            .to_string()
    } else {
        format!(r#"<p class="resume-preview-empty">{NO_RESUME_MESSAGE}</p>"#)
    }
}

fn skills_list(skills: &[String]) -> String {
    if skills.is_empty() {
        return r#"<ul class="skills-matched-list"><li>No skills matched.</li></ul>"#.to_string();
    }
    let items: String = skills
        .iter()
        .map(|skill| format!("<li>{}</li>", escape_html(skill)))
        .collect();
    format!(r#"<ul class="skills-matched-list">{items}</ul>"#)
}

fn filter_select(selected: FeedbackFilter) -> String {
    let options: String = FeedbackFilter::options()
        .map(|option| {
            let marker = if option == selected { " selected" } else { "" };
            format!(
                r#"<option value="{}"{marker}>{}</option>"#,
                option.value(),
                option.label()
            )
        })
        .collect();
    format!(
        r#"<form class="feedback-filter" method="get" action="/dashboard">
  <label for="filter">Filter feedback:</label>
  <select id="filter" name="filter" onchange="this.form.submit()">{options}</select>
  <noscript><button type="submit">Apply</button></noscript>
</form>"#
    )
}

/// Filtered view over the feedback. The source list is rendered from, never changed.
pub fn feedback_list(result: &FitScoreResult, filter: FeedbackFilter) -> String {
    let visible = filter_feedback(&result.feedback, filter);
    let items: String = if visible.is_empty() {
        format!(r#"<li class="no-feedback">{NO_FEEDBACK_MESSAGE}</li>"#)
    } else {
        visible
            .iter()
            .map(|item| {
                format!(
                    "<li><strong>{}:</strong> {}</li>",
                    item.category.label(),
                    escape_html(&item.text)
                )
            })
            .collect()
    };
    format!(r#"<ul class="feedback-filter-list">{items}</ul>"#)
}

fn ready_body(result: &FitScoreResult, filter: FeedbackFilter, has_resume: bool) -> String {
    format!(
        r#"<section class="resume-section">
  <h2>Your Resume</h2>
  {preview}
</section>
<section class="fit-score-section">
  <h2>Resume Fit Score</h2>
  <div class="resume-fit-score-percentage">{score}%</div>
</section>
<section class="skills-section">
  <h2>Matched Skills</h2>
  {skills}
</section>
<section class="feedback-section">
  <h2>Feedback</h2>
  {select}
  {feedback}
</section>
<a class="download-report-btn" href="/dashboard/report">Download Report</a>"#,
        preview = resume_preview(has_resume),
        score = result.fit_score,
        skills = skills_list(&result.matched_skills),
        select = filter_select(filter),
        feedback = feedback_list(result, filter),
    )
}

pub fn dashboard_page(
    state: &DashboardState,
    filter: FeedbackFilter,
    has_resume: bool,
) -> Html<String> {
    let content = match state {
        DashboardState::Loading => r#"<p class="loading">Loading...</p>"#.to_string(),
        DashboardState::Error(message) => format!(
            r#"<div class="dashboard-error" role="alert">Error: {}</div>"#,
            escape_html(message)
        ),
        DashboardState::Ready(result) => ready_body(result, filter, has_resume),
    };
    page("Dashboard", &format!("<h1>Dashboard</h1>\n{content}"))
}
