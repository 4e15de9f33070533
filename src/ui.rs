use crate::models::{AdherenceReport, DayView, DoseStatus, Feedback, Schedule, Weekday, hhmm};
use chrono::Datelike;

pub const COMMON_MEDICINES: &[&str] = &[
    "Acetaminophen",
    "Albuterol",
    "Amoxicillin",
    "Aspirin",
    "Atorvastatin",
    "Azithromycin",
    "Ibuprofen",
    "Indomethacin",
    "Insulin",
    "Iron Supplement",
    "Ivermectin",
    "Levothyroxine",
    "Lisinopril",
    "Losartan",
    "Metformin",
    "Montelukast",
    "Omeprazole",
    "Ondansetron",
    "Pantoprazole",
    "Paracetamol",
    "Prednisone",
    "Sertraline",
    "Simvastatin",
    "Tamsulosin",
    "Tramadol",
    "Vitamin D",
    "Warfarin",
];

pub const QUOTES: &[&str] = &[
    "Every dose taken is a step toward wellness.",
    "Consistency builds strength.",
    "You're doing great, keep it up!",
    "Health is the real wealth.",
    "Small steps lead to big changes.",
    "Your effort today shapes your tomorrow.",
    "Peace of mind starts with care.",
    "One dose at a time, you're healing.",
    "Celebrate every dose taken!",
];

pub fn render_index(today: &DayView, adherence: &AdherenceReport, schedules: &[Schedule]) -> String {
    let quote = QUOTES[today.date.ordinal0() as usize % QUOTES.len()];
    let alert = if today.alert {
        r#"<audio id="beep" src="/alert.wav" autoplay></audio>"#
    } else {
        ""
    };

    INDEX_HTML
        .replace("{{DATE}}", &today.date.to_string())
        .replace("{{WEEKDAY}}", today.weekday.name())
        .replace("{{REMINDER}}", &today.reminder_minutes.to_string())
        .replace("{{PERCENT}}", &adherence.percentage.to_string())
        .replace("{{TAKEN}}", &adherence.taken.to_string())
        .replace("{{EXPECTED}}", &adherence.expected.to_string())
        .replace("{{WEEK}}", &adherence.week)
        .replace("{{FEEDBACK}}", feedback_message(adherence.feedback))
        .replace("{{FEEDBACK_CLASS}}", feedback_class(adherence.feedback))
        .replace("{{CELEBRATE}}", if adherence.celebrate { "celebrate" } else { "" })
        .replace("{{QUOTE}}", quote)
        .replace("{{DAY_OPTIONS}}", &day_options(today.weekday))
        .replace("{{MEDICINES}}", &medicine_options())
        .replace("{{ALERT}}", alert)
        .replace("{{CHECKLIST}}", &render_checklist(today))
        .replace("{{SCHEDULES}}", &render_schedules(schedules))
}

fn render_schedules(schedules: &[Schedule]) -> String {
    if schedules.is_empty() {
        return r#"<p class="empty">No schedules yet.</p>"#.to_string();
    }

    let mut html = String::from(r#"<ul class="schedules">"#);
    for schedule in schedules {
        let name = escape(&schedule.name);
        let days: Vec<&str> = schedule.days.iter().map(|day| &day.name()[..3]).collect();
        let times: Vec<String> = schedule
            .times
            .iter()
            .map(|time| time.format(hhmm::FORMAT).to_string())
            .collect();
        html.push_str(&format!(
            r#"<li><span class="name">{name}</span><span class="hint">{days_label} at {times_label} from {start}</span><button type="button" data-schedule-action="edit" data-id="{id}" data-name="{name}" data-days="{days_csv}" data-times="{times_label}" data-start="{start}">Edit</button><button type="button" data-schedule-action="delete" data-id="{id}">Delete</button></li>"#,
            id = schedule.id,
            start = schedule.start_date,
            days_label = days.join(" "),
            days_csv = days.join(","),
            times_label = times.join(", "),
        ));
    }
    html.push_str("</ul>");
    html
}

fn render_checklist(today: &DayView) -> String {
    if today.doses.is_empty() {
        return r#"<p class="empty">No doses scheduled for today. Enjoy your day!</p>"#.to_string();
    }

    let mut html = String::from(r#"<ul class="checklist">"#);
    for dose in &today.doses {
        let time = dose.time.format(hhmm::FORMAT).to_string();
        let name = escape(&dose.name);
        let (pill, label) = match dose.status {
            DoseStatus::Taken => ("pill-green", "Taken".to_string()),
            DoseStatus::Missed => ("pill-red", "Missed".to_string()),
            DoseStatus::Due => ("pill-yellow", format!("Reminder! in {} min", dose.minutes_until.unwrap_or(0))),
            DoseStatus::Upcoming => ("pill-blue", format!("in {} min", dose.minutes_until.unwrap_or(0))),
        };
        let action = if dose.status == DoseStatus::Taken {
            "unmark"
        } else {
            "take"
        };
        let button = if action == "take" { "Mark as taken" } else { "Undo" };

        html.push_str(&format!(
            r#"<li><span class="time">{time}</span><span class="name">{name}</span><span class="pill {pill}">{label}</span><button type="button" data-action="{action}" data-date="{date}" data-name="{name}" data-time="{time}">{button}</button></li>"#,
            date = today.date,
        ));
    }
    html.push_str("</ul>");
    html
}

fn feedback_message(feedback: Feedback) -> &'static str {
    match feedback {
        Feedback::Excellent => "Amazing consistency!",
        Feedback::Good => "Good job, keep going!",
        Feedback::NeedsAttention => "Let's try to hit more doses this week!",
    }
}

fn feedback_class(feedback: Feedback) -> &'static str {
    match feedback {
        Feedback::Excellent => "ok",
        Feedback::Good => "info",
        Feedback::NeedsAttention => "warn",
    }
}

fn day_options(today: Weekday) -> String {
    Weekday::ALL
        .into_iter()
        .map(|day| {
            let checked = if day == today { " checked" } else { "" };
            format!(
                r#"<label><input type="checkbox" name="days" value="{day}"{checked} /> {short}</label>"#,
                short = &day.name()[..3]
            )
        })
        .collect()
}

fn medicine_options() -> String {
    COMMON_MEDICINES
        .iter()
        .map(|name| format!(r#"<option value="{name}"></option>"#))
        .collect()
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>MedTimer</title>
  <style>
    :root {
      --bg: #f0f8ff;
      --ink: #004d40;
      --accent: #00695c;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 24px 60px rgba(0, 77, 64, 0.14);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      font-size: 18px;
      padding: 32px 18px 48px;
    }

    h1, h2 {
      color: var(--accent);
      margin: 0 0 12px;
    }

    .app {
      max-width: 1200px;
      margin: 0 auto;
      display: grid;
      grid-template-columns: 1.3fr 1.7fr 1.2fr;
      gap: 24px;
    }

    .card {
      background: var(--card);
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 24px;
      display: grid;
      gap: 12px;
      align-content: start;
    }

    .checklist {
      list-style: none;
      padding: 0;
      margin: 0;
      display: grid;
      gap: 10px;
    }

    .schedules {
      list-style: none;
      padding: 0;
      margin: 0;
      display: grid;
      gap: 8px;
    }

    .schedules li {
      display: grid;
      grid-template-columns: 1fr auto auto;
      gap: 6px;
      align-items: center;
    }

    .schedules .hint {
      grid-column: 1 / -1;
    }

    .checklist li {
      display: grid;
      grid-template-columns: 64px 1fr auto auto;
      align-items: center;
      gap: 10px;
    }

    .time {
      font-weight: 600;
    }

    .pill {
      display: inline-block;
      padding: 2px 10px;
      border-radius: 999px;
      font-weight: 600;
      color: white;
      font-size: 0.85rem;
    }

    .pill-green { background: #2e7d32; }
    .pill-yellow { background: #fbc02d; color: #1a1a1a; }
    .pill-red { background: #d32f2f; }
    .pill-blue { background: #0277bd; }

    button {
      border: none;
      border-radius: 999px;
      padding: 8px 14px;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    .gauge {
      font-size: 3rem;
      font-weight: 700;
    }

    .feedback.ok { color: #2e7d32; }
    .feedback.info { color: #0277bd; }
    .feedback.warn { color: #d32f2f; }

    .celebrate .gauge {
      animation: pop 900ms ease 3;
    }

    .days label {
      margin-right: 8px;
      font-size: 0.9rem;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .hint, .empty {
      color: #5f6f6a;
      font-size: 0.9rem;
    }

    @keyframes pop {
      50% { transform: scale(1.2); }
    }

    @media (max-width: 900px) {
      .app {
        grid-template-columns: 1fr;
      }
    }
  </style>
</head>
<body>
  <h1>MedTimer: your daily medicine companion</h1>
  <main class="app">
    <section class="card">
      <h2 id="form-title">Add medicine schedule</h2>
      <form id="schedule-form">
        <label>Medicine name
          <input name="name" list="medicines" required />
        </label>
        <datalist id="medicines">{{MEDICINES}}</datalist>
        <div class="days">{{DAY_OPTIONS}}</div>
        <label>Dose times (comma separated HH:MM)
          <input name="times" value="09:00" required />
        </label>
        <label>Start date
          <input name="start_date" type="date" value="{{DATE}}" />
        </label>
        <button type="submit" id="form-submit">Add schedule</button>
      </form>
      <label>Reminder window (minutes before dose)
        <input id="reminder" type="number" min="1" max="60" value="{{REMINDER}}" />
      </label>
      <div class="status" id="status"></div>
      <h2>Schedules</h2>
      {{SCHEDULES}}
    </section>

    <section class="card">
      <h2>Today's checklist</h2>
      <p class="hint">{{WEEKDAY}} {{DATE}}</p>
      {{CHECKLIST}}
    </section>

    <section class="card {{CELEBRATE}}">
      <h2>This week</h2>
      <p class="hint">{{WEEK}}: {{TAKEN}} of {{EXPECTED}} doses taken</p>
      <div class="gauge">{{PERCENT}}%</div>
      <p class="feedback {{FEEDBACK_CLASS}}">{{FEEDBACK}}</p>
      <p class="hint">{{QUOTE}}</p>
      <form method="post" action="/taken/clear">
        <button type="submit">Clear all taken marks (reset week)</button>
      </form>
    </section>
  </main>
  {{ALERT}}

  <script>
    const statusEl = document.getElementById('status');

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const send = async (method, url, body) => {
      const res = await fetch(url, {
        method,
        headers: { 'content-type': 'application/json' },
        body: body === undefined ? undefined : JSON.stringify(body)
      });
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      return res;
    };

    const beep = document.getElementById('beep');
    if (beep) {
      beep.play().catch(() => {});
    }

    document.querySelectorAll('[data-action]').forEach((button) => {
      button.addEventListener('click', () => {
        const { action, date, name, time } = button.dataset;
        const url = action === 'take' ? '/api/taken' : '/api/taken/remove';
        send('POST', url, { date, name, time })
          .then(() => window.location.reload())
          .catch((err) => setStatus(err.message, 'error'));
      });
    });

    const scheduleForm = document.getElementById('schedule-form');

    document.querySelectorAll('[data-schedule-action]').forEach((button) => {
      button.addEventListener('click', () => {
        const { scheduleAction, id } = button.dataset;
        if (scheduleAction === 'delete') {
          send('DELETE', `/api/schedules/${id}`)
            .then(() => window.location.reload())
            .catch((err) => setStatus(err.message, 'error'));
          return;
        }
        const days = button.dataset.days.split(',');
        scheduleForm.dataset.editId = id;
        scheduleForm.elements.namedItem('name').value = button.dataset.name;
        scheduleForm.elements.namedItem('times').value = button.dataset.times;
        scheduleForm.elements.namedItem('start_date').value = button.dataset.start;
        scheduleForm.querySelectorAll('input[name="days"]').forEach((box) => {
          box.checked = days.includes(box.value.slice(0, 3));
        });
        document.getElementById('form-title').textContent = 'Edit medicine schedule';
        document.getElementById('form-submit').textContent = 'Save changes';
      });
    });

    scheduleForm.addEventListener('submit', (event) => {
      event.preventDefault();
      const form = new FormData(event.target);
      const payload = {
        name: form.get('name'),
        days: form.getAll('days'),
        times: String(form.get('times')).split(',').map((t) => t.trim()).filter(Boolean),
        start_date: form.get('start_date') || null
      };
      const editId = scheduleForm.dataset.editId;
      const request = editId
        ? send('PUT', `/api/schedules/${editId}`, payload)
        : send('POST', '/api/schedules', payload);
      request
        .then(() => window.location.reload())
        .catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('reminder').addEventListener('change', (event) => {
      send('PUT', '/api/settings', { reminder_minutes: Number(event.target.value) })
        .then(() => window.location.reload())
        .catch((err) => setStatus(err.message, 'error'));
    });
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppData, TakenKey};
    use crate::{adherence::weekly_adherence_at, status::day_view};
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn page_lists_doses_and_escapes_names() {
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut data = AppData::default();
        data.add_schedule(
            &crate::models::ScheduleInput {
                name: "<Aspirin & co>".to_string(),
                days: vec!["Monday".to_string()],
                times: vec!["08:00".to_string()],
                start_date: Some(monday),
            },
            monday,
        )
        .unwrap();

        let now = monday.and_hms_opt(7, 50, 0).unwrap();
        let html = render_index(
            &day_view(monday, now, &data),
            &weekly_adherence_at(monday, &data).unwrap(),
            &data.schedules,
        );
        assert!(html.contains("&lt;Aspirin &amp; co&gt;"));
        assert!(!html.contains("<Aspirin"));
        assert!(html.contains(r#"data-schedule-action="delete" data-id="1""#));
        assert!(html.contains(r#"data-days="Mon" data-times="08:00" data-start="2024-01-01""#));
        assert!(html.contains("Reminder! in 10 min"));
        assert!(html.contains(r#"src="/alert.wav""#));
        assert!(html.contains(r#"<div class="gauge">0%</div>"#));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn empty_day_renders_placeholder() {
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut data = AppData::default();
        data.taken
            .insert(TakenKey::new(monday, "Orphan", NaiveTime::from_hms_opt(8, 0, 0).unwrap()));
        let now = monday.and_hms_opt(12, 0, 0).unwrap();

        let html = render_index(
            &day_view(monday, now, &data),
            &weekly_adherence_at(monday, &data).unwrap(),
            &data.schedules,
        );
        assert!(html.contains("No doses scheduled for today"));
        assert!(html.contains("No schedules yet."));
        assert!(html.contains(r#"<div class="gauge">100%</div>"#));
        assert!(!html.contains("alert.wav"));
    }
}
