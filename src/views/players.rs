use std::fmt::Write;

use super::{escape, escape_opt, layout};
use crate::entities::players;

/// `GET /` listing.
#[must_use]
pub fn players_index(rows: &[players::Model]) -> String {
    let mut body = String::from("<h1>Players</h1>\n<p><a href=\"/create\">Add a player</a></p>\n");

    if rows.is_empty() {
        body.push_str("<p>No players yet.</p>");
        return layout("Players", &body);
    }

    body.push_str(
        "<table>\n<tr><th>Name</th><th>Position</th><th>Team</th><th>Number</th><th>Added</th></tr>\n",
    );
    for p in rows {
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&p.name),
            escape_opt(p.position.as_deref()),
            escape_opt(p.team.as_deref()),
            p.jersey_number.map(|n| n.to_string()).unwrap_or_default(),
            p.created_at.format("%Y-%m-%d %H:%M"),
        );
    }
    body.push_str("</table>");

    layout("Players", &body)
}

#[must_use]
pub fn create_player_form() -> String {
    layout(
        "Add player",
        "<h1>Add a player</h1>\n\
         <form method=\"post\" action=\"/create\">\n\
         <label>Name <input name=\"name\" required maxlength=\"100\"></label>\n\
         <label>Position <input name=\"position\" maxlength=\"50\"></label>\n\
         <label>Team <input name=\"team\" maxlength=\"100\"></label>\n\
         <label>Jersey number <input name=\"jersey_number\" type=\"number\"></label>\n\
         <button type=\"submit\">Save</button>\n\
         </form>\n\
         <p><a href=\"/\">Back to players</a></p>",
    )
}

#[must_use]
pub fn dummy_player_added(player: &players::Model) -> String {
    layout(
        "Dummy player added",
        &format!(
            "<h1>Dummy player added!</h1>\n<p>Name: {}</p>\n<p><a href=\"/\">Back to players</a></p>",
            escape(&player.name)
        ),
    )
}

/// Result of `GET /initdb`.
#[must_use]
pub fn initdb_done(seeded: usize) -> String {
    let detail = if seeded == 0 {
        "Database already contains players.".to_string()
    } else {
        format!("Inserted {seeded} sample players.")
    };
    layout(
        "Database initialised",
        &format!(
            "<h1>Tables created</h1>\n<p>{detail}</p>\n<p><a href=\"/\">Back to players</a></p>"
        ),
    )
}
