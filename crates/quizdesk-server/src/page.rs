//! Server-rendered student pages.
//!
//! The quiz page is a single self-contained HTML document with CSS and JS
//! inlined. Questions are rendered on the server; the script only polls the
//! timer and posts the answers.

use quizdesk_core::model::QuestionType;
use quizdesk_core::session::{QuizView, StudentQuestion};

/// Escape a string for safe HTML insertion.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Render the quiz page for one session.
pub fn render_quiz(view: &QuizView) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{}</title>\n", html_escape(&view.title)));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str(&format!(
        "<main id=\"quiz\" data-timer-minutes=\"{}\" data-require-name=\"{}\">\n",
        view.timer_minutes, view.require_full_name
    ));
    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&view.title)));
    html.push_str(&format!(
        "<div id=\"timer\" class=\"timer\">{}:00</div>\n",
        view.timer_minutes
    ));
    html.push_str("</header>\n");

    if !view.start_message.trim().is_empty() {
        html.push_str(&format!(
            "<p class=\"start-message\">{}</p>\n",
            html_escape(&view.start_message)
        ));
    }

    html.push_str("<form id=\"quiz-form\" onsubmit=\"return submitQuiz(event)\">\n");

    let required = if view.require_full_name { " required" } else { "" };
    html.push_str("<div class=\"student\">\n");
    html.push_str(&format!(
        "<label for=\"student_name\">Full name{}</label>\n",
        if view.require_full_name { " *" } else { "" }
    ));
    html.push_str(&format!(
        "<input type=\"text\" id=\"student_name\" name=\"student_name\" autocomplete=\"name\"{required}>\n"
    ));
    html.push_str("</div>\n");

    for question in &view.questions {
        html.push_str(&render_question(question));
    }

    html.push_str("<button type=\"submit\" id=\"submit\">Submit</button>\n");
    html.push_str("</form>\n");
    html.push_str("<div id=\"message\" class=\"message\" hidden></div>\n");
    html.push_str("</main>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");
    html.push_str("</body>\n</html>");
    html
}

fn render_question(q: &StudentQuestion) -> String {
    let name = format!("q{}", q.index);
    let mut html = format!(
        "<fieldset class=\"question\" data-index=\"{}\" data-type=\"{}\">\n",
        q.index, q.question_type
    );
    html.push_str(&format!(
        "<legend><span class=\"number\">{}.</span> {} <span class=\"points\">({} pt{})</span></legend>\n",
        q.index + 1,
        html_escape(&q.text),
        q.weight,
        if q.weight == 1.0 { "" } else { "s" }
    ));

    let choice = |input_type: &str, value: &str| {
        format!(
            "<label class=\"choice\"><input type=\"{input_type}\" name=\"{name}\" value=\"{v}\"> {v}</label>\n",
            v = html_escape(value)
        )
    };

    match q.question_type {
        QuestionType::MultipleChoiceSingle => {
            for option in &q.options {
                html.push_str(&choice("radio", option));
            }
        }
        QuestionType::MultipleChoiceMultiple => {
            for option in &q.options {
                html.push_str(&choice("checkbox", option));
            }
        }
        QuestionType::TrueFalse => {
            html.push_str(&choice("radio", "True"));
            html.push_str(&choice("radio", "False"));
        }
        QuestionType::ShortAnswer => {
            html.push_str(&format!("<input type=\"text\" name=\"{name}\">\n"));
        }
        QuestionType::Paragraph => {
            html.push_str(&format!("<textarea name=\"{name}\" rows=\"5\"></textarea>\n"));
        }
    }

    html.push_str("</fieldset>\n");
    html
}

/// Render a standalone error page.
pub fn render_error(message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Quiz unavailable</title>\n\
         <style>\n{CSS}</style>\n</head>\n<body>\n<main class=\"error\">\n<h1>Quiz unavailable</h1>\n\
         <p>{}</p>\n</main>\n</body>\n</html>",
        html_escape(message)
    )
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --accent: #2563eb; --warn: #dc2626; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --accent: #60a5fa; --warn: #f87171; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans Arabic', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); unicode-bidi: plaintext; }
main { max-width: 48rem; margin: 0 auto; }
header { display: flex; justify-content: space-between; align-items: center; gap: 1rem; }
.timer { font-variant-numeric: tabular-nums; font-size: 1.5rem; font-weight: bold; }
.timer.low { color: var(--warn); }
.start-message { padding: 1rem; border-left: 4px solid var(--accent); background: var(--border); }
.student, .question { border: 1px solid var(--border); border-radius: 8px; padding: 1rem; margin: 1rem 0; }
.student input { width: 100%; padding: 0.5rem; box-sizing: border-box; }
legend { font-weight: bold; padding: 0 0.5rem; }
.points { color: #6b7280; font-weight: normal; }
.choice { display: block; margin: 0.4rem 0; }
.question input[type=text], textarea { width: 100%; padding: 0.5rem; box-sizing: border-box; }
button { background: var(--accent); color: #fff; border: 0; border-radius: 6px; padding: 0.75rem 2rem; font-size: 1rem; cursor: pointer; }
button:disabled { opacity: 0.5; cursor: default; }
.message { padding: 1rem; border-radius: 8px; background: var(--border); margin-top: 1rem; }
.message.error { color: var(--warn); }
.error h1 { color: var(--warn); }
"#;

const JS: &str = r#"
let remaining = null;
let submitted = false;
let autoSent = false;
let locked = false;

function collectAnswers() {
  const answers = {};
  document.querySelectorAll('.question').forEach(q => {
    const idx = q.dataset.index;
    const type = q.dataset.type;
    if (type === 'multiple_choice_multiple') {
      const picked = Array.from(q.querySelectorAll('input:checked')).map(i => i.value);
      if (picked.length) answers[idx] = picked;
    } else if (type === 'multiple_choice_single' || type === 'true_false') {
      const picked = q.querySelector('input:checked');
      if (picked) answers[idx] = picked.value;
    } else {
      const field = q.querySelector('input, textarea');
      if (field && field.value.trim() !== '') answers[idx] = field.value;
    }
  });
  return answers;
}

function showMessage(text, isError) {
  const box = document.getElementById('message');
  box.textContent = text;
  box.classList.toggle('error', !!isError);
  box.hidden = false;
}

function lockForm() {
  locked = true;
  document.querySelectorAll('#quiz-form input, #quiz-form textarea, #quiz-form button')
    .forEach(el => { el.disabled = true; });
}

async function sendAnswers(auto) {
  if (submitted || locked) return;
  const name = document.getElementById('student_name').value.trim();
  const requireName = document.getElementById('quiz').dataset.requireName === 'true';
  if (requireName && !name && !auto) {
    showMessage('Please enter your full name before submitting.', true);
    return;
  }
  const button = document.getElementById('submit');
  button.disabled = true;
  try {
    const res = await fetch('/api/submit', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      credentials: 'same-origin',
      body: JSON.stringify({ student_name: name, answers: collectAnswers() })
    });
    const body = await res.json();
    if (res.ok && body.success) {
      submitted = true;
      document.getElementById('quiz-form').hidden = true;
      showMessage(body.message, false);
    } else if (res.status === 403 || res.status === 404) {
      lockForm();
      showMessage(body.error || 'This quiz session has ended.', true);
    } else {
      button.disabled = false;
      showMessage(body.error || 'Submission failed.', true);
    }
  } catch (e) {
    button.disabled = false;
    showMessage('Could not reach the server. Please try again.', true);
  }
}

function submitQuiz(event) {
  event.preventDefault();
  sendAnswers(false);
  return false;
}

function renderTimer() {
  const el = document.getElementById('timer');
  const s = Math.max(0, remaining);
  const m = Math.floor(s / 60);
  el.textContent = m + ':' + String(s % 60).padStart(2, '0');
  el.classList.toggle('low', s <= 60);
}

async function syncTimer() {
  try {
    const res = await fetch('/api/quiz_data', { credentials: 'same-origin' });
    if (!res.ok) return;
    const data = await res.json();
    remaining = data.time_remaining_seconds;
    renderTimer();
  } catch (e) {}
}

syncTimer();
setInterval(syncTimer, 30000);
setInterval(() => {
  if (remaining === null || submitted || locked) return;
  remaining -= 1;
  renderTimer();
  if (remaining <= 0 && !autoSent) {
    autoSent = true;
    sendAnswers(true);
  }
}, 1000);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn view() -> QuizView {
        QuizView {
            session_id: "abc".into(),
            title: "Fractions & <Decimals>".into(),
            start_message: "Good luck!".into(),
            timer_minutes: 15,
            require_full_name: true,
            questions: vec![
                StudentQuestion {
                    index: 0,
                    text: "Pick one".into(),
                    weight: 1.0,
                    question_type: QuestionType::MultipleChoiceSingle,
                    options: vec!["1/2".into(), "\"quoted\"".into()],
                },
                StudentQuestion {
                    index: 1,
                    text: "Pick many".into(),
                    weight: 2.0,
                    question_type: QuestionType::MultipleChoiceMultiple,
                    options: vec!["A".into(), "B".into()],
                },
                StudentQuestion {
                    index: 2,
                    text: "Explain".into(),
                    weight: 3.0,
                    question_type: QuestionType::Paragraph,
                    options: vec![],
                },
            ],
            start_time: Utc::now(),
        }
    }

    #[test]
    fn escapes_html() {
        assert_eq!(
            html_escape("<a href='x'>&\"</a>"),
            "&lt;a href=&#x27;x&#x27;&gt;&amp;&quot;&lt;/a&gt;"
        );
    }

    #[test]
    fn quiz_page_renders_questions() {
        let html = render_quiz(&view());
        assert!(html.contains("<title>Fractions &amp; &lt;Decimals&gt;</title>"));
        assert!(html.contains("Good luck!"));
        assert!(html.contains("data-type=\"multiple_choice_single\""));
        assert!(html.contains("type=\"radio\" name=\"q0\" value=\"&quot;quoted&quot;\""));
        assert!(html.contains("type=\"checkbox\" name=\"q1\" value=\"A\""));
        assert!(html.contains("<textarea name=\"q2\""));
        assert!(html.contains("15:00"));
        assert!(html.contains(" required>"));
    }

    #[test]
    fn timer_auto_submits_once_and_stops_on_rejection() {
        let html = render_quiz(&view());
        assert!(html.contains("if (remaining <= 0 && !autoSent) {"));
        assert!(html.contains("autoSent = true;"));
        assert!(html.contains("if (submitted || locked) return;"));
        assert!(html.contains("res.status === 403"));
        assert!(html.contains("lockForm();"));
        assert_eq!(html.matches("sendAnswers(true)").count(), 1);
    }

    #[test]
    fn error_page_escapes_message() {
        let html = render_error("No <quiz>");
        assert!(html.contains("No &lt;quiz&gt;"));
        assert!(html.contains("Quiz unavailable"));
    }
}
