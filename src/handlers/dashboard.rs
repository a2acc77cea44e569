use askama::Template;
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
    Extension,
};
use axum_extra::extract::cookie::SignedCookieJar;
use chrono::NaiveDate;
use serde::Deserialize;

use super::render;
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::set_record::DATE_FORMAT;
use crate::models::{
    Category, DailyGroup, Exercise, HistoryEntry, HistoryOrder, PersonalBest, TrendPoint,
};
use crate::repositories::{
    AccountRepository, ExerciseRepository, SetRecordRepository, StatsRepository,
};
use crate::session::SessionKey;

const CHART_WIDTH: f64 = 300.0;
const CHART_HEIGHT: f64 = 80.0;

/// Shared by every page that shows the dashboard, including form handlers
/// that re-render it with an error.
#[derive(Clone)]
pub struct DashboardState {
    pub accounts: AccountRepository,
    pub exercises: ExerciseRepository,
    pub records: SetRecordRepository,
    pub stats: StatsRepository,
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub category: Option<String>,
    pub date: Option<String>,
}

impl DashboardQuery {
    fn category(&self) -> Option<Category> {
        self.category.as_deref().and_then(Category::parse)
    }

    fn date(&self) -> Option<NaiveDate> {
        let raw = self.date.as_deref()?;
        NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
    }
}

pub struct CategoryOption {
    value: &'static str,
    label: &'static str,
    selected: bool,
}

pub struct DayOption {
    value: String,
    selected: bool,
}

pub struct TrendChart {
    name: String,
    points: Vec<TrendPoint>,
    polyline: String,
}

#[derive(Template)]
#[template(path = "dashboard/index.html")]
struct DashboardTemplate {
    user: AuthUser,
    error: Option<String>,
    categories: Vec<CategoryOption>,
    category_filter: &'static str,
    exercises: Vec<Exercise>,
    today: String,
    history: Vec<HistoryEntry>,
    bests: Vec<PersonalBest>,
    day: String,
    days: Vec<DayOption>,
    daily: Vec<DailyGroup>,
    trends: Vec<TrendChart>,
    chart_width: f64,
    chart_height: f64,
}

pub async fn index(
    State(state): State<DashboardState>,
    Extension(key): Extension<SessionKey>,
    headers: HeaderMap,
    auth_user: AuthUser,
    Query(query): Query<DashboardQuery>,
) -> Result<Response> {
    // The cookie can outlive its account when the database is replaced.
    // Drop it, or the sign-in page sends the browser straight back here.
    if state.accounts.find_by_id(auth_user.id).await?.is_none() {
        tracing::warn!(account_id = %auth_user.id, "Session for unknown account");
        let jar = AuthUser::logout(SignedCookieJar::from_headers(&headers, key.0));
        return Ok((jar, Redirect::to("/auth/login")).into_response());
    }

    Ok(render_dashboard(&state, auth_user, &query, None)
        .await?
        .into_response())
}

pub(crate) async fn render_dashboard(
    state: &DashboardState,
    user: AuthUser,
    query: &DashboardQuery,
    error: Option<String>,
) -> Result<Html<String>> {
    let today = chrono::Local::now().date_naive();
    let category = query.category();

    let exercises = state.exercises.list(category).await?;
    let history = state
        .records
        .history(user.id, HistoryOrder::NewestFirst)
        .await?;
    let bests = state.stats.personal_best_list(user.id).await?;
    let training_days = state.stats.training_days(user.id).await?;

    // Default to the most recent day with anything logged
    let day = query
        .date()
        .or_else(|| training_days.first().copied())
        .unwrap_or(today);
    let daily = state.stats.daily_log(user.id, day).await?;

    let trends = state
        .stats
        .trend_series(user.id)
        .await?
        .into_iter()
        .map(|(name, points)| TrendChart {
            polyline: sparkline(&points, CHART_WIDTH, CHART_HEIGHT),
            name,
            points,
        })
        .collect();

    let template = DashboardTemplate {
        user,
        error,
        categories: category_options(category),
        category_filter: category.map(|c| c.as_str()).unwrap_or(""),
        exercises,
        today: today.format(DATE_FORMAT).to_string(),
        history,
        bests,
        day: day.format(DATE_FORMAT).to_string(),
        days: training_days
            .into_iter()
            .map(|d| DayOption {
                value: d.format(DATE_FORMAT).to_string(),
                selected: d == day,
            })
            .collect(),
        daily,
        trends,
        chart_width: CHART_WIDTH,
        chart_height: CHART_HEIGHT,
    };

    render(&template)
}

fn category_options(selected: Option<Category>) -> Vec<CategoryOption> {
    Category::ALL
        .into_iter()
        .map(|c| CategoryOption {
            value: c.as_str(),
            label: c.display_name(),
            selected: selected == Some(c),
        })
        .collect()
}

/// SVG polyline points for a series, scaled into a `width` x `height` box.
fn sparkline(points: &[TrendPoint], width: f64, height: f64) -> String {
    if points.is_empty() {
        return String::new();
    }

    let min = points.iter().map(|p| p.weight).fold(f64::INFINITY, f64::min);
    let max = points
        .iter()
        .map(|p| p.weight)
        .fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    let step = if points.len() > 1 {
        width / (points.len() - 1) as f64
    } else {
        0.0
    };

    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let x = if points.len() > 1 {
                step * i as f64
            } else {
                width / 2.0
            };
            let y = if span > 0.0 {
                height - (p.weight - min) / span * height
            } else {
                height / 2.0
            };
            format!("{x:.1},{y:.1}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(d: u32, weight: f64) -> TrendPoint {
        TrendPoint {
            date: NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
            weight,
        }
    }

    #[test]
    fn test_sparkline_scales_into_box() {
        let line = sparkline(&[point(1, 50.0), point(2, 100.0), point(3, 75.0)], 200.0, 100.0);
        assert_eq!(line, "0.0,100.0 100.0,0.0 200.0,50.0");
    }

    #[test]
    fn test_sparkline_flat_and_single() {
        assert_eq!(sparkline(&[], 200.0, 100.0), "");
        assert_eq!(sparkline(&[point(1, 60.0)], 200.0, 100.0), "100.0,50.0");
        assert_eq!(
            sparkline(&[point(1, 60.0), point(2, 60.0)], 200.0, 100.0),
            "0.0,50.0 200.0,50.0"
        );
    }

    #[test]
    fn test_query_ignores_unknown_values() {
        let query = DashboardQuery {
            category: Some("arms".to_string()),
            date: Some("soon".to_string()),
        };
        assert_eq!(query.category(), None);
        assert_eq!(query.date(), None);

        let query = DashboardQuery {
            category: Some("legs".to_string()),
            date: Some("2024-02-29".to_string()),
        };
        assert_eq!(query.category(), Some(Category::Legs));
        assert_eq!(query.date(), NaiveDate::from_ymd_opt(2024, 2, 29));
    }
}
