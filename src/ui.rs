use crate::calendar::{DayCell, MonthView};
use crate::models::MilestoneView;
use std::fmt::Write;

pub fn render_index(view: &MonthView, streak: u32, milestone: &MilestoneView) -> String {
    let dialog_hidden = if milestone.celebrating { "" } else { "hidden" };
    let milestone_days = milestone.milestone.unwrap_or(streak);
    INDEX_HTML
        .replace("{{MONTH_LABEL}}", &escape_html(&view.label))
        .replace("{{MONTH}}", &view.month)
        .replace("{{PREV}}", &view.prev)
        .replace("{{NEXT}}", &view.next)
        .replace("{{STREAK}}", &streak.to_string())
        .replace("{{DIALOG_HIDDEN}}", dialog_hidden)
        .replace("{{MILESTONE}}", &milestone_days.to_string())
        // notes are user text; substitute the grid last
        .replace("{{GRID}}", &render_grid(view))
}

fn render_grid(view: &MonthView) -> String {
    let mut html = String::new();
    for weekday in view.weekdays {
        let _ = writeln!(html, r#"<div class="weekday">{weekday}</div>"#);
    }
    for _ in 0..view.leading_blanks {
        html.push_str("<div class=\"blank\"></div>\n");
    }
    for cell in &view.cells {
        render_cell(&mut html, cell, &view.month);
    }
    html
}

fn render_cell(html: &mut String, cell: &DayCell, month: &str) {
    let mut classes = String::from("day");
    if !cell.in_month {
        classes.push_str(" outside");
    }
    if cell.is_today {
        classes.push_str(" today");
    }
    if cell.completed {
        classes.push_str(" completed");
    }
    if cell.failed {
        classes.push_str(" failed");
    }
    let mark = if cell.completed {
        "&#127942;"
    } else if cell.failed {
        "&#10005;"
    } else {
        ""
    };
    let date = &cell.date;
    let note = escape_html(&cell.note);

    let _ = write!(
        html,
        r#"<details class="{classes}" data-date="{date}">
  <summary><span class="num">{day}</span><span class="mark">{mark}</span></summary>
  <div class="popover">
    <div class="popover-title">{label}</div>
    <div class="toggles">
      <form method="post" action="/day/{date}/toggle/completed" data-kind="completed">
        <input type="hidden" name="month" value="{month}" />
        <button type="submit" class="switch" aria-pressed="{completed}">Completed</button>
      </form>
      <form method="post" action="/day/{date}/toggle/failed" data-kind="failed">
        <input type="hidden" name="month" value="{month}" />
        <button type="submit" class="switch" aria-pressed="{failed}">Not Completed</button>
      </form>
    </div>
    <form method="post" action="/day/{date}/note" class="note-form">
      <input type="hidden" name="month" value="{month}" />
      <label for="note-{date}">Note</label>
      <input id="note-{date}" name="note" value="{note}" placeholder="Add a note for this day" autocomplete="off" />
      <button type="submit" class="save">Save note</button>
    </form>
  </div>
</details>
"#,
        day = cell.day,
        label = escape_html(&cell.label),
        completed = cell.completed,
        failed = cell.failed,
    );
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Target Tracker Calendar</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f3f4f6;
      --bg-2: #e5e7eb;
      --ink: #1f2933;
      --muted: #6b7280;
      --primary: #1f2937;
      --primary-ink: #f9fafb;
      --done: #dcfce7;
      --done-edge: #86efac;
      --done-ink: #16a34a;
      --miss: #fee2e2;
      --miss-edge: #fca5a5;
      --miss-ink: #dc2626;
      --card: rgba(255, 255, 255, 0.94);
      --shadow: 0 24px 60px rgba(31, 41, 51, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(180deg, var(--bg-1), var(--bg-2));
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      padding: 48px 16px;
    }

    .app {
      width: min(900px, 100%);
      margin: 0 auto;
      background: var(--card);
      border-radius: 20px;
      box-shadow: var(--shadow);
      overflow: hidden;
      animation: rise 600ms ease;
    }

    header {
      background: var(--primary);
      color: var(--primary-ink);
      padding: 22px 28px;
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
      align-items: center;
      justify-content: space-between;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(1.5rem, 3vw, 2rem);
      margin: 0;
    }

    .streak {
      background: var(--primary-ink);
      color: var(--primary);
      border-radius: 999px;
      padding: 6px 14px;
      font-size: 0.9rem;
    }

    .content {
      padding: 24px 28px 28px;
      display: grid;
      gap: 20px;
    }

    nav {
      display: flex;
      align-items: center;
      justify-content: space-between;
    }

    nav h2 {
      margin: 0;
      font-size: 1.5rem;
    }

    nav a {
      color: var(--ink);
      text-decoration: none;
      border: 1px solid var(--bg-2);
      border-radius: 10px;
      padding: 8px 14px;
      font-weight: 600;
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 8px;
    }

    .weekday {
      text-align: center;
      font-weight: 600;
      font-size: 0.85rem;
      color: var(--muted);
      padding: 6px 0;
    }

    .blank {
      height: 64px;
    }

    .day {
      position: relative;
    }

    .day summary {
      list-style: none;
      height: 64px;
      border: 1px solid var(--bg-2);
      border-radius: 10px;
      background: white;
      cursor: pointer;
      display: flex;
      flex-direction: column;
      align-items: center;
      padding-top: 6px;
      gap: 2px;
    }

    .day summary::-webkit-details-marker {
      display: none;
    }

    .day.outside summary {
      opacity: 0.5;
    }

    .day.today summary {
      border-color: var(--primary);
    }

    .day.today .num {
      font-weight: 700;
    }

    .day.completed summary {
      background: var(--done);
      border-color: var(--done-edge);
    }

    .day.failed summary {
      background: var(--miss);
      border-color: var(--miss-edge);
    }

    .day.completed .mark {
      color: var(--done-ink);
    }

    .day.failed .mark {
      color: var(--miss-ink);
    }

    .popover {
      position: absolute;
      z-index: 10;
      top: 70px;
      left: 0;
      width: 300px;
      background: white;
      border-radius: 12px;
      box-shadow: var(--shadow);
      padding: 16px;
      display: grid;
      gap: 14px;
    }

    .popover-title {
      font-weight: 600;
    }

    .toggles {
      display: flex;
      gap: 10px;
    }

    .switch {
      appearance: none;
      border: 1px solid var(--bg-2);
      background: white;
      border-radius: 999px;
      padding: 6px 12px;
      font: inherit;
      cursor: pointer;
    }

    .switch[aria-pressed="true"] {
      background: var(--primary);
      color: var(--primary-ink);
    }

    .note-form {
      display: grid;
      gap: 6px;
    }

    .note-form input[name="note"] {
      font: inherit;
      padding: 8px 10px;
      border-radius: 8px;
      border: 1px solid var(--bg-2);
    }

    .save {
      justify-self: start;
      font: inherit;
      border: none;
      background: none;
      color: var(--muted);
      cursor: pointer;
      padding: 0;
    }

    .legend {
      font-size: 0.9rem;
      color: var(--muted);
      display: grid;
      gap: 4px;
    }

    .legend span {
      display: inline-block;
      width: 14px;
      height: 14px;
      border-radius: 4px;
      vertical-align: middle;
      margin-right: 6px;
    }

    .legend .done {
      background: var(--done);
      border: 1px solid var(--done-edge);
    }

    .legend .miss {
      background: var(--miss);
      border: 1px solid var(--miss-edge);
    }

    .status {
      font-size: 0.9rem;
      color: var(--muted);
      min-height: 1.2em;
    }

    .status[data-type="error"] {
      color: var(--miss-ink);
    }

    .backdrop {
      position: fixed;
      inset: 0;
      background: rgba(17, 24, 39, 0.55);
      display: grid;
      place-items: center;
      z-index: 50;
    }

    .backdrop[hidden] {
      display: none;
    }

    .dialog {
      width: min(420px, 90vw);
      background: white;
      border-radius: 16px;
      padding: 24px;
      text-align: center;
      display: grid;
      gap: 12px;
    }

    .dialog .trophy {
      font-size: 4.5rem;
    }

    .dialog button {
      justify-self: center;
      border: none;
      border-radius: 10px;
      padding: 10px 18px;
      background: var(--primary);
      color: var(--primary-ink);
      font: inherit;
      cursor: pointer;
    }

    @keyframes rise {
      from {
        opacity: 0;
        transform: translateY(18px);
      }
      to {
        opacity: 1;
        transform: translateY(0);
      }
    }

    @media (max-width: 600px) {
      .content {
        padding: 18px 12px;
      }
      .popover {
        width: 240px;
      }
    }
  </style>
</head>
<body>
  <main class="app" data-month="{{MONTH}}">
    <header>
      <h1>Target Tracker Calendar</h1>
      <div class="streak">&#127942; Streak: <strong id="streak">{{STREAK}}</strong> days</div>
    </header>

    <section class="content">
      <nav>
        <a href="/?month={{PREV}}" id="prev">&larr; Previous</a>
        <h2>{{MONTH_LABEL}}</h2>
        <a href="/?month={{NEXT}}" id="next">Next &rarr;</a>
      </nav>

      <div class="grid">
{{GRID}}
      </div>

      <div class="legend">
        <div><span class="done"></span>Completed</div>
        <div><span class="miss"></span>Not Completed</div>
      </div>
      <div class="status" id="status"></div>
    </section>
  </main>

  <div class="backdrop" id="milestone" {{DIALOG_HIDDEN}}>
    <div class="dialog" role="dialog" aria-modal="true" aria-labelledby="milestone-title">
      <h2 id="milestone-title">Congratulations!</h2>
      <p>You&#39;ve reached a milestone streak of <strong id="milestone-days">{{MILESTONE}}</strong> days!</p>
      <div class="trophy">&#127942;</div>
      <p><strong>Keep up the great work! You&#39;re making excellent progress towards your goals.</strong></p>
      <form method="post" action="/milestone/dismiss" id="dismiss-form">
        <input type="hidden" name="month" value="{{MONTH}}" />
        <button type="submit">Continue Tracking</button>
      </form>
    </div>
  </div>

  <script>
    const statusEl = document.getElementById('status');
    const streakEl = document.getElementById('streak');
    const dialogEl = document.getElementById('milestone');
    const milestoneDaysEl = document.getElementById('milestone-days');

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const request = async (method, url, body) => {
      const res = await fetch(url, {
        method,
        headers: { 'content-type': 'application/json' },
        body: body === undefined ? undefined : JSON.stringify(body)
      });
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      return res.json();
    };

    const showMilestone = (milestone) => {
      if (milestone.celebrating) {
        milestoneDaysEl.textContent = milestone.milestone;
        dialogEl.hidden = false;
      } else {
        dialogEl.hidden = true;
      }
    };

    const applyDay = (cell, day) => {
      cell.classList.toggle('completed', day.completed);
      cell.classList.toggle('failed', day.failed);
      cell.querySelector('.mark').textContent = day.completed ? '\u{1F3C6}' : day.failed ? '✕' : '';
      cell.querySelector('[data-kind="completed"] .switch').setAttribute('aria-pressed', String(day.completed));
      cell.querySelector('[data-kind="failed"] .switch').setAttribute('aria-pressed', String(day.failed));
    };

    const applyMutation = (cell, data) => {
      applyDay(cell, data.day);
      streakEl.textContent = data.streak;
      showMilestone(data.milestone);
    };

    document.querySelectorAll('.day').forEach((cell) => {
      const date = cell.dataset.date;

      cell.querySelectorAll('form[data-kind]').forEach((form) => {
        form.addEventListener('submit', (event) => {
          event.preventDefault();
          request('POST', `/api/days/${date}/toggle`, { kind: form.dataset.kind })
            .then((data) => applyMutation(cell, data))
            .catch((err) => setStatus(err.message, 'error'));
        });
      });

      const noteForm = cell.querySelector('.note-form');
      const noteInput = noteForm.querySelector('input[name="note"]');
      let pending = null;
      const saveNote = () => {
        clearTimeout(pending);
        pending = null;
        request('PUT', `/api/days/${date}/note`, { note: noteInput.value })
          .then((data) => applyMutation(cell, data))
          .catch((err) => setStatus(err.message, 'error'));
      };
      noteInput.addEventListener('input', () => {
        clearTimeout(pending);
        pending = setTimeout(saveNote, 400);
      });
      noteForm.addEventListener('submit', (event) => {
        event.preventDefault();
        saveNote();
      });

      cell.addEventListener('toggle', () => {
        if (!cell.open) {
          return;
        }
        document.querySelectorAll('.day[open]').forEach((other) => {
          if (other !== cell) {
            other.open = false;
          }
        });
      });
    });

    document.getElementById('dismiss-form').addEventListener('submit', (event) => {
      event.preventDefault();
      request('POST', '/api/milestone/dismiss')
        .then(showMilestone)
        .catch((err) => setStatus(err.message, 'error'));
    });
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{build_month_view, MonthRef};
    use crate::models::{CalendarStore, StatusKind};
    use chrono::NaiveDate;

    fn idle() -> MilestoneView {
        MilestoneView {
            celebrating: false,
            milestone: None,
            highest_shown: 0,
        }
    }

    #[test]
    fn page_has_one_cell_per_day_and_leading_blanks() {
        let month = MonthRef::new(2026, 10).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let view = build_month_view(&CalendarStore::default(), month, today);
        let html = render_index(&view, 0, &idle());

        assert_eq!(html.matches("<details class=\"day").count(), 31);
        assert_eq!(html.matches("class=\"blank\"").count(), 4);
        assert!(html.contains("<h2>October 2026</h2>"));
        assert!(html.contains("href=\"/?month=2026-09\""));
        assert!(html.contains("href=\"/?month=2026-11\""));
        assert!(html.contains("class=\"day today\" data-date=\"2026-10-17\""));
        assert!(html.contains("id=\"milestone\" hidden"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn notes_are_escaped_and_status_classes_applied() {
        let mut store = CalendarStore::default();
        let day = NaiveDate::from_ymd_opt(2026, 10, 2).unwrap();
        store.toggle_status(day, StatusKind::Completed);
        store.set_note(day, "<script>\"x\" & y</script>");
        let view = build_month_view(&store, MonthRef::new(2026, 10).unwrap(), day);
        let html = render_index(&view, 1, &idle());

        assert!(html.contains("class=\"day today completed\" data-date=\"2026-10-02\""));
        assert!(html.contains("value=\"&lt;script&gt;&quot;x&quot; &amp; y&lt;/script&gt;\""));
        assert!(!html.contains("<script>\"x\""));
    }

    #[test]
    fn celebrating_page_shows_dialog() {
        let month = MonthRef::new(2026, 10).unwrap();
        let view = build_month_view(&CalendarStore::default(), month, month.first_day());
        let milestone = MilestoneView {
            celebrating: true,
            milestone: Some(20),
            highest_shown: 20,
        };
        let html = render_index(&view, 20, &milestone);
        assert!(html.contains("id=\"milestone\" >"));
        assert!(html.contains("<strong id=\"milestone-days\">20</strong>"));
    }
}
