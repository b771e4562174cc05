use std::fmt::{self, Write};

use tracing::error;

use viewer_core_api::ChartPage;

const STYLE: &str = r#"
        body { font-family: Arial, sans-serif; margin: 20px; background-color: #f4f4f4; }
        .container { background-color: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); max-width: 800px; margin: auto; }
        h1 { color: #333; text-align: center; margin-bottom: 30px; }
        form { display: flex; flex-direction: column; gap: 15px; margin-bottom: 30px; }
        label { font-weight: bold; color: #555; }
        input[type="date"] { padding: 10px; border: 1px solid #ccc; border-radius: 4px; font-size: 16px; }
        button { background-color: #007bff; color: white; padding: 12px 20px; border: none; border-radius: 4px; cursor: pointer; font-size: 16px; }
        button:hover { background-color: #0056b3; }
        .error { color: red; text-align: center; margin-top: 20px; }
        .chart-container { text-align: center; margin-top: 30px; }
        .chart-container img { max-width: 100%; height: auto; border: 1px solid #eee; border-radius: 4px; }
        .footer { text-align: center; margin-top: 40px; color: #777; font-size: 0.9em; }
"#;

pub fn render(page: &ChartPage) -> String {
    let mut html = String::with_capacity(4096);
    if let Err(err) = write_page(&mut html, page) {
        error!("Failed to render page: {err}");
    }
    html
}

fn write_page(html: &mut String, page: &ChartPage) -> fmt::Result {
    let instrument = escape(&page.instrument.to_string());
    writeln!(html, "<!DOCTYPE html>\n<html lang=\"en\">\n<head>")?;
    writeln!(html, "    <meta charset=\"UTF-8\">")?;
    writeln!(html, "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">")?;
    writeln!(html, "    <title>{instrument} price chart</title>")?;
    writeln!(html, "    <style>{STYLE}    </style>\n</head>\n<body>")?;
    writeln!(html, "    <div class=\"container\">")?;
    writeln!(html, "        <h1>{instrument} price history</h1>")?;

    writeln!(html, "        <form method=\"POST\">")?;
    write_date_input(html, "start_date", "Start date", &page.start_date)?;
    write_date_input(html, "end_date", "End date", &page.end_date)?;
    writeln!(html, "            <button type=\"submit\">Show chart</button>")?;
    writeln!(html, "        </form>")?;

    if let Some(err) = page.error() {
        writeln!(html, "        <p class=\"error\">{}</p>", escape(err.user_message()))?;
    }
    if let Some(image) = page.image() {
        writeln!(html, "        <h2>Price chart</h2>")?;
        writeln!(html, "        <div class=\"chart-container\">")?;
        writeln!(
            html,
            "            <img src=\"{}\" alt=\"{instrument} price chart\">",
            image.data_uri()
        )?;
        writeln!(html, "        </div>")?;
    }

    writeln!(html, "    </div>")?;
    writeln!(
        html,
        "    <div class=\"footer\">\n        <p>Data source: {}</p>\n    </div>",
        escape(&page.data_source)
    )?;
    writeln!(html, "</body>\n</html>")
}

fn write_date_input(html: &mut String, name: &str, label: &str, value: &str) -> fmt::Result {
    writeln!(html, "            <label for=\"{name}\">{label}:</label>")?;
    writeln!(
        html,
        "            <input type=\"date\" id=\"{name}\" name=\"{name}\" value=\"{}\" required>",
        escape(value)
    )
}

fn escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
