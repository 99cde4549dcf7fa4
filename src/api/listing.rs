//! Public HTML page listing every survey with its options and vote counts.
use crate::api::error::{map_store_error, ApiError};
use crate::app::AppState;
use crate::models::{Survey, SurveyOption};
use axum::extract::State;
use axum::response::Html;
use std::collections::HashMap;
use std::fmt::Write;

pub(crate) async fn survey_list(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let surveys = state
        .store
        .list_surveys()
        .await
        .map_err(|err| map_store_error(err, "surveys", "list"))?;
    let options = state
        .store
        .list_all_options()
        .await
        .map_err(|err| map_store_error(err, "options", "list"))?;
    Ok(Html(render_page(&group_by_survey(surveys, options))))
}

// Options arrive already ordered, so pushing keeps each survey's order.
fn group_by_survey(
    surveys: Vec<Survey>,
    options: Vec<SurveyOption>,
) -> Vec<(Survey, Vec<SurveyOption>)> {
    let mut by_survey: HashMap<i64, Vec<SurveyOption>> = HashMap::new();
    for option in options {
        by_survey.entry(option.survey_id).or_default().push(option);
    }
    surveys
        .into_iter()
        .map(|survey| {
            let options = by_survey.remove(&survey.id).unwrap_or_default();
            (survey, options)
        })
        .collect()
}

fn render_page(sections: &[(Survey, Vec<SurveyOption>)]) -> String {
    let mut page = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Surveys</title>\n</head>\n<body>\n<h1>Surveys</h1>\n",
    );
    if sections.is_empty() {
        page.push_str("<p>No surveys yet.</p>\n");
    }
    for (survey, options) in sections {
        // Writing into a String cannot fail.
        let _ = write!(
            page,
            "<section id=\"survey-{}\">\n<h2>{}</h2>\n<p>{}</p>\n<ol>\n",
            survey.id,
            escape_html(&survey.name),
            escape_html(&survey.description)
        );
        for option in options {
            let _ = writeln!(
                page,
                "<li id=\"option-{}\">{} <span class=\"votes\">{}</span></li>",
                option.id,
                escape_html(&option.description),
                option.votes
            );
        }
        page.push_str("</ol>\n</section>\n");
    }
    page.push_str("</body>\n</html>\n");
    page
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}
