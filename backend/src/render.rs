use actix_web::http::StatusCode;

use crate::models::AnalysisReport;
use crate::sanitize::escape_html;

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
  <link rel="stylesheet" href="/static/style.css">
</head>
<body>
  <main>
{body}
  </main>
</body>
</html>
"#,
        title = escape_html(title),
        body = body
    )
}

pub fn index_page(max_text_length: usize) -> String {
    let body = format!(
        r#"    <h1>PII Analyzer</h1>
    <form action="/analyze" method="post">
      <label for="text">Text to analyze</label>
      <textarea id="text" name="text" rows="10" maxlength="{max}" required></textarea>
      <p class="hint">Up to {max} characters.</p>
      <button type="submit">Analyze</button>
    </form>"#,
        max = max_text_length
    );
    layout("PII Analyzer", &body)
}

pub fn result_page(report: &AnalysisReport) -> String {
    let findings = if report.findings.is_empty() {
        "    <p class=\"empty\">No PII detected.</p>".to_string()
    } else {
        let rows: String = report
            .findings
            .iter()
            .map(|f| {
                format!(
                    "        <tr><td>{}</td><td>{}</td></tr>\n",
                    escape_html(&f.text),
                    escape_html(&f.label)
                )
            })
            .collect();
        format!(
            "    <table class=\"findings\">\n      <thead><tr><th>Text</th><th>Label</th></tr></thead>\n      <tbody>\n{}      </tbody>\n    </table>",
            rows
        )
    };

    let body = format!(
        r#"    <h1>Analysis result</h1>
    <h2>Submitted text</h2>
    <pre class="submitted">{text}</pre>
    <h2>Detected PII ({count})</h2>
{findings}
    <p><a href="/">Analyze another text</a></p>"#,
        text = escape_html(&report.text),
        count = report.findings.len(),
        findings = findings
    );
    layout("Analysis result", &body)
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        r#"    <h1>Error {code}</h1>
    <p class="error">{message}</p>
    <p><a href="/">Back to the form</a></p>"#,
        code = status.as_u16(),
        message = escape_html(message)
    );
    layout("Error", &body)
}
