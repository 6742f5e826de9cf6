//! Plain text rendering of the user list.

use crate::model::User;

const HEADERS: [&str; 3] = ["ID", "EMAIL", "CREATED"];

/// Render `users` as an aligned grid, or a status line while loading or
/// when there is nothing to show.
pub fn render_grid(users: &[User], is_loading: bool) -> String {
    if is_loading {
        return "Loading...\n".to_owned();
    }
    if users.is_empty() {
        return "No users.\n".to_owned();
    }

    let rows: Vec<[String; 3]> = users
        .iter()
        .map(|user| {
            [
                user.id.to_string(),
                user.email.clone(),
                user.created_at.format("%Y-%m-%d %H:%M").to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = format_row(&HEADERS, &widths);
    for row in &rows {
        out.push_str(&format_row(row, &widths));
    }
    out
}

fn format_row<S: AsRef<str>>(cells: &[S; 3], widths: &[usize; 3]) -> String {
    let [id, email, created] = cells;
    let [id_width, email_width, _] = *widths;
    format!(
        "{:<id_width$}  {:<email_width$}  {}\n",
        id.as_ref(),
        email.as_ref(),
        created.as_ref()
    )
}
