use std::fmt::Write;

use super::{escape, escape_opt, layout};
use crate::entities::{Outcome, courses, students};
use crate::services::{FixtureWithPrediction, is_web_url};

fn error_banner(error: Option<&str>) -> String {
    error
        .map(|msg| format!("<p class=\"error\">{}</p>\n", escape(msg)))
        .unwrap_or_default()
}

#[must_use]
pub fn register_form(error: Option<&str>, name: &str, email: &str) -> String {
    layout(
        "Register",
        &format!(
            "<h1>Create an account</h1>\n{banner}\
             <form method=\"post\" action=\"/register\">\n\
             <label>Name <input name=\"name\" value=\"{name}\" required></label>\n\
             <label>Email <input name=\"email\" type=\"email\" value=\"{email}\" required></label>\n\
             <label>Password <input name=\"password\" type=\"password\" minlength=\"8\" required></label>\n\
             <button type=\"submit\">Register</button>\n\
             </form>\n\
             <p>Already registered? <a href=\"/login\">Log in</a></p>",
            banner = error_banner(error),
            name = escape(name),
            email = escape(email),
        ),
    )
}

/// Login page. The Google button is rendered only when a client id is configured.
#[must_use]
pub fn login_form(error: Option<&str>, google_client_id: &str) -> String {
    let google = if google_client_id.is_empty() {
        String::new()
    } else {
        format!(
            "<script src=\"https://accounts.google.com/gsi/client\" async></script>\n\
             <div id=\"g_id_onload\" data-client_id=\"{}\" data-login_uri=\"/auth/google\" \
             data-ux_mode=\"redirect\"></div>\n\
             <div class=\"g_id_signin\" data-type=\"standard\"></div>\n",
            escape(google_client_id)
        )
    };

    layout(
        "Login",
        &format!(
            "<h1>Log in</h1>\n{banner}\
             <form method=\"post\" action=\"/login\">\n\
             <label>Email <input name=\"email\" type=\"email\" required></label>\n\
             <label>Password <input name=\"password\" type=\"password\" required></label>\n\
             <button type=\"submit\">Log in</button>\n\
             </form>\n{google}\
             <p>No account? <a href=\"/register\">Register</a></p>",
            banner = error_banner(error),
        ),
    )
}

fn course_card(course: &courses::Model, action: &str) -> String {
    let image = course
        .image
        .as_deref()
        .filter(|src| is_web_url(src))
        .map(|src| format!("<img src=\"{}\" alt=\"\" width=\"120\">", escape(src)))
        .unwrap_or_default();
    let link = course
        .link
        .as_deref()
        .filter(|href| is_web_url(href))
        .map(|href| format!(" <a href=\"{}\">Course page</a>", escape(href)))
        .unwrap_or_default();
    format!(
        "<li>{image}<strong>{}</strong> {}{link}<br>{}{action}</li>\n",
        escape(&course.course_name),
        course
            .instructor
            .as_deref()
            .map(|i| format!("with {}", escape(i)))
            .unwrap_or_default(),
        escape_opt(course.description.as_deref()),
    )
}

fn odds(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".to_string())
}

fn match_row(entry: &FixtureWithPrediction) -> String {
    let m = &entry.fixture;
    let pick = entry.prediction.as_ref().map_or_else(
        || {
            let mut options = String::new();
            for outcome in Outcome::ALL {
                let _ = write!(
                    options,
                    "<option value=\"{}\">{}</option>",
                    outcome.as_str(),
                    escape(&outcome.describe(&m.team1, &m.team2))
                );
            }
            format!(
                "<form method=\"post\" action=\"/submit-prediction\">\
                 <input type=\"hidden\" name=\"match_id\" value=\"{}\">\
                 <select name=\"outcome\">{options}</select>\
                 <button type=\"submit\">Predict</button></form>",
                m.id
            )
        },
        |p| match Outcome::from_str(&p.outcome) {
            Some(outcome) => format!("Your pick: {}", escape(&outcome.describe(&m.team1, &m.team2))),
            None => format!("Your pick: {}", escape(&p.outcome)),
        },
    );

    format!(
        "<tr><td>{}</td><td>{}</td><td>{} v {}</td><td>{}</td><td>{}</td>\
         <td>{} / {} / {}</td><td>{pick}</td></tr>\n",
        m.match_number,
        escape(&m.date),
        escape(&m.team1),
        escape(&m.team2),
        escape_opt(m.group.as_deref()),
        escape_opt(m.stadium.as_deref()),
        odds(m.win_odds),
        odds(m.draw_odds),
        odds(m.loss_odds),
    )
}

/// `GET /dashboard` for a logged-in student.
#[must_use]
pub fn dashboard(
    student: &students::Model,
    enrolled: &[courses::Model],
    catalogue: &[courses::Model],
    fixtures: &[FixtureWithPrediction],
) -> String {
    let mut body = format!(
        "<h1>Welcome, {}</h1>\n\
         <form method=\"post\" action=\"/logout\"><button type=\"submit\">Log out</button></form>\n\
         <h2>My courses</h2>\n",
        escape(&student.name)
    );

    if enrolled.is_empty() {
        body.push_str("<p>You are not enrolled in any course yet.</p>\n");
    } else {
        body.push_str("<ul>\n");
        for course in enrolled {
            body.push_str(&course_card(course, ""));
        }
        body.push_str("</ul>\n");
    }

    body.push_str("<h2>All courses</h2>\n<ul>\n");
    for course in catalogue {
        let action = if enrolled.iter().any(|c| c.id == course.id) {
            " <em>Enrolled</em>".to_string()
        } else {
            format!(
                " <form method=\"post\" action=\"/enroll/{}\"><button type=\"submit\">Enroll</button></form>",
                course.id
            )
        };
        body.push_str(&course_card(course, &action));
    }
    body.push_str("</ul>\n");

    body.push_str("<h2>Matches</h2>\n");
    if fixtures.is_empty() {
        body.push_str("<p>No matches scheduled.</p>");
    } else {
        body.push_str(
            "<table>\n<tr><th>#</th><th>Date</th><th>Teams</th><th>Group</th><th>Stadium</th>\
             <th>Odds (win / draw / loss)</th><th>Prediction</th></tr>\n",
        );
        for entry in fixtures {
            body.push_str(&match_row(entry));
        }
        body.push_str("</table>");
    }

    layout("Dashboard", &body)
}

/// `GET /admin`: students, courses, and the add-course form.
#[must_use]
pub fn admin_page(students: &[students::Model], courses: &[courses::Model]) -> String {
    let mut body = String::from("<h1>Administration</h1>\n<h2>Students</h2>\n<table>\n\
                                 <tr><th>Name</th><th>Email</th><th>Google linked</th></tr>\n");
    for s in students {
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&s.name),
            escape(&s.email),
            if s.google_id.is_some() { "yes" } else { "no" }
        );
    }
    body.push_str("</table>\n<h2>Courses</h2>\n<ul>\n");
    for course in courses {
        body.push_str(&course_card(course, ""));
    }
    body.push_str(
        "</ul>\n<h2>Add a course</h2>\n\
         <form method=\"post\" action=\"/add_course\">\n\
         <label>Course name <input name=\"course_name\" required></label>\n\
         <label>Instructor <input name=\"instructor\"></label>\n\
         <label>Image URL <input name=\"image\"></label>\n\
         <label>Link <input name=\"link\"></label>\n\
         <label>Description <textarea name=\"description\"></textarea></label>\n\
         <button type=\"submit\">Add course</button>\n\
         </form>",
    );

    layout("Admin", &body)
}
