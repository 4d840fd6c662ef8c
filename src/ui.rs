use crate::grid::{Grid, OccupancyCell};
use crate::rack::{LoadState, RackSnapshot};
use std::fmt::Write;

pub fn render_index(snapshot: &RackSnapshot, selected: &str) -> String {
    let (total, utilization) = snapshot
        .statistics
        .as_ref()
        .map(|stats| (stats.total_reservations, stats.utilization_percent))
        .unwrap_or((0, 0.0));
    let week = snapshot
        .week
        .map(|window| format!("{} to {}", window.start(), window.end()))
        .unwrap_or_else(|| "no week selected".to_string());

    INDEX_HTML
        .replace("{{SELECTED}}", selected)
        .replace("{{WEEK}}", &week)
        .replace("{{STATE}}", state_label(snapshot.state))
        .replace("{{STATUS}}", &status_line(snapshot))
        .replace("{{TOTAL}}", &total.to_string())
        .replace("{{UTILIZATION}}", &format!("{utilization}"))
        .replace("{{RACK}}", &render_table(snapshot.grid.as_ref()))
}

fn state_label(state: LoadState) -> &'static str {
    match state {
        LoadState::Idle => "idle",
        LoadState::Loading => "loading",
        LoadState::Ready => "ok",
        LoadState::Failed => "error",
    }
}

fn status_line(snapshot: &RackSnapshot) -> String {
    match (snapshot.state, snapshot.error.as_deref()) {
        (LoadState::Failed, Some(message)) => format!("Could not load the rack: {}", escape(message)),
        (LoadState::Loading, _) => "Loading rack...".to_string(),
        (LoadState::Idle, _) => "Pick a date to load its week.".to_string(),
        _ => String::new(),
    }
}

fn render_table(grid: Option<&Grid>) -> String {
    let Some(grid) = grid else {
        return String::new();
    };

    let mut html = String::from("<table class=\"rack\">\n<thead><tr><th>Block</th>");
    for day in grid.days() {
        let _ = write!(html, "<th>{}</th>", escape(&day.label));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for (block, row) in grid.blocks().iter().zip(grid.rows()) {
        let _ = write!(html, "<tr><td class=\"block\">{block}</td>");
        for cell in row {
            html.push_str(&render_cell(cell));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>");
    html
}

fn render_cell(cell: &OccupancyCell) -> String {
    if !cell.is_occupied() {
        return "<td class=\"free\">Available</td>".to_string();
    }
    let mut html = String::from("<td class=\"busy\">");
    for reservation in &cell.reservations {
        let _ = write!(
            html,
            "<div class=\"booking\"><strong>#{}</strong> {} riders, ${:.0}</div>",
            reservation.id, reservation.occupants, reservation.total
        );
    }
    html.push_str("</td>");
    html
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Weekly Kart Rack</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      padding: 32px 18px 48px;
    }

    .app {
      max-width: 1280px;
      margin: 0 auto;
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.8rem);
      margin: 0;
    }

    .subtitle {
      margin: 0;
      color: #5f5c57;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 16px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 8px;
    }

    .stat .label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .stat .value {
      font-size: 1.5rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    form {
      display: flex;
      gap: 12px;
      align-items: center;
    }

    input[type="date"] {
      font: inherit;
      padding: 10px 14px;
      border-radius: 12px;
      border: 1px solid rgba(47, 72, 88, 0.2);
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 12px 20px;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    .status {
      color: #6b645d;
      min-height: 1.2em;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .rack {
      width: 100%;
      border-collapse: collapse;
      background: white;
      font-size: 0.9rem;
    }

    .rack th, .rack td {
      border: 1px solid rgba(47, 72, 88, 0.12);
      padding: 8px;
      vertical-align: top;
      text-align: center;
    }

    .rack th {
      background: var(--accent-2);
      color: white;
    }

    .rack td.block {
      font-weight: 600;
      background: #f7f2ea;
    }

    .rack td.free {
      color: #2d7a4b;
      background: #eef8f0;
    }

    .rack td.busy {
      background: #fff1d6;
    }

    .booking + .booking {
      margin-top: 6px;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Weekly Kart Rack</h1>
      <p class="subtitle">Occupancy by day and time block for {{WEEK}}.</p>
    </header>

    <form method="post" action="/week">
      <input type="date" name="date" value="{{SELECTED}}" />
      <button type="submit">Show week</button>
    </form>

    <p class="status" data-type="{{STATE}}">{{STATUS}}</p>

    <section class="panel">
      <div class="stat">
        <span class="label">Reservations</span>
        <span class="value">{{TOTAL}}</span>
      </div>
      <div class="stat">
        <span class="label">Occupancy</span>
        <span class="value">{{UTILIZATION}}%</span>
      </div>
    </section>

    <section>
      {{RACK}}
    </section>
  </main>
</body>
</html>
"#;
