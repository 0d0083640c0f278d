/// Message shown above the charts after a form submission.
#[derive(Debug, Clone, PartialEq)]
pub enum PageStatus {
    Idle,
    Saved { label: String, count: u64 },
    Warning(String),
}

pub fn render_index(status: &PageStatus, csv_file: &str) -> String {
    let (message, kind) = match status {
        PageStatus::Idle => (String::new(), ""),
        PageStatus::Saved { label, count } => (
            format!("Saved '{label}'. {count} recorded for this food."),
            "ok",
        ),
        PageStatus::Warning(message) => (message.clone(), "error"),
    };
    INDEX_HTML
        .replace("{{STATUS_TYPE}}", kind)
        .replace("{{STATUS}}", &escape_html(&message))
        .replace("{{CSV_FILE}}", &escape_html(csv_file))
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Food Photo Log</title>
  <style>
    :root {
      --bg: #fbf6ee;
      --ink: #2b2a28;
      --muted: #6f6a65;
      --accent: #e0603c;
      --card: #ffffff;
      --shadow: 0 18px 48px rgba(60, 40, 20, 0.14);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 1rem 14px;
    }

    .app {
      width: min(760px, 100%);
      background: var(--card);
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 28px;
      display: grid;
      gap: 22px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.6rem, 4vw, 2.2rem);
    }

    h2 {
      margin: 0 0 10px;
      font-size: 1.2rem;
    }

    form {
      display: grid;
      gap: 14px;
    }

    label {
      display: grid;
      gap: 6px;
      font-weight: 600;
    }

    input[type="text"] {
      padding: 12px 14px;
      border-radius: 12px;
      border: 1px solid #ddd3c6;
      font-size: 1rem;
    }

    button {
      border: none;
      border-radius: 999px;
      padding: 14px 20px;
      font-size: 1rem;
      font-weight: 600;
      background: var(--accent);
      color: white;
      cursor: pointer;
    }

    .status {
      min-height: 1.2em;
      color: var(--muted);
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .chart {
      width: 100%;
      display: block;
    }

    .chart text {
      font-size: 11px;
      fill: var(--muted);
    }

    .legend {
      display: flex;
      flex-wrap: wrap;
      gap: 10px;
      font-size: 0.9rem;
    }

    .legend span::before {
      content: "";
      display: inline-block;
      width: 10px;
      height: 10px;
      margin-right: 6px;
      border-radius: 2px;
      background: var(--swatch);
    }

    .hint {
      margin: 0;
      color: var(--muted);
      font-size: 0.9rem;
    }

    hr {
      border: none;
      border-top: 1px solid #eee4d8;
      width: 100%;
    }
  </style>
</head>
<body>
  <main class="app">
    <h1>Food Photo Log</h1>

    <form id="save-form" method="post" action="/save" enctype="multipart/form-data">
      <label>Food name (e.g. kimchi, apple, ramen)
        <input type="text" name="label" autocomplete="off" />
      </label>
      <label>Take a photo
        <input type="file" name="camera" accept="image/*" capture="environment" />
      </label>
      <label>Or upload a photo
        <input type="file" name="upload" accept=".jpg,.jpeg,.png" />
      </label>
      <button type="submit">Save</button>
    </form>

    <div class="status" id="status" data-type="{{STATUS_TYPE}}">{{STATUS}}</div>

    <section id="charts" hidden>
      <hr />
      <h2>Share by food</h2>
      <svg id="pie" class="chart" viewBox="0 0 600 260" role="img" aria-label="Share by food"></svg>
      <div id="pie-legend" class="legend"></div>
      <hr />
      <h2>Foods per day</h2>
      <svg id="by-date" class="chart" viewBox="0 0 600 240" role="img" aria-label="Foods per day"></svg>
      <hr />
      <h2>Foods per weekday</h2>
      <svg id="by-weekday" class="chart" viewBox="0 0 600 240" role="img" aria-label="Foods per weekday"></svg>
      <div id="bar-legend" class="legend"></div>
      <p class="hint">Saved CSV file: <code>{{CSV_FILE}}</code></p>
    </section>
  </main>

  <script>
    const statusEl = document.getElementById('status');
    const chartsEl = document.getElementById('charts');
    const palette = ['#e0603c', '#2f4858', '#f2a541', '#6a994e', '#8e5572', '#3d7ea6', '#c9a227', '#9c6644'];
    const color = (index) => palette[index % palette.length];

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const escapeText = (text) => String(text)
      .replace(/&/g, '&amp;')
      .replace(/</g, '&lt;')
      .replace(/>/g, '&gt;');

    const renderLegend = (el, labels) => {
      el.innerHTML = labels
        .map((label, i) => `<span style="--swatch:${color(i)}">${escapeText(label)}</span>`)
        .join('');
    };

    const renderPie = (shares) => {
      const svg = document.getElementById('pie');
      const cx = 300;
      const cy = 130;
      const r = 110;
      let angle = -Math.PI / 2;
      if (shares.length === 1) {
        svg.innerHTML = `<circle cx="${cx}" cy="${cy}" r="${r}" fill="${color(0)}" />` +
          `<text x="${cx}" y="${cy}" text-anchor="middle">100.0%</text>`;
      } else {
        svg.innerHTML = shares.map((share, i) => {
          const sweep = (share.percent / 100) * Math.PI * 2;
          const start = [cx + r * Math.cos(angle), cy + r * Math.sin(angle)];
          const mid = angle + sweep / 2;
          angle += sweep;
          const end = [cx + r * Math.cos(angle), cy + r * Math.sin(angle)];
          const large = sweep > Math.PI ? 1 : 0;
          const tx = cx + r * 0.6 * Math.cos(mid);
          const ty = cy + r * 0.6 * Math.sin(mid);
          return `<path d="M ${cx} ${cy} L ${start[0]} ${start[1]} A ${r} ${r} 0 ${large} 1 ${end[0]} ${end[1]} Z" fill="${color(i)}" />` +
            `<text x="${tx}" y="${ty}" text-anchor="middle">${share.percent.toFixed(1)}%</text>`;
        }).join('');
      }
      renderLegend(document.getElementById('pie-legend'), shares.map((s) => s.label));
    };

    const renderStacked = (svgId, series, allLabels) => {
      const svg = document.getElementById(svgId);
      const width = 600;
      const height = 240;
      const pad = 34;
      const totals = series.values.map((row) => row.reduce((a, b) => a + b, 0));
      const max = Math.max(1, ...totals);
      const slot = (width - pad * 2) / Math.max(1, series.categories.length);
      const barWidth = Math.min(48, slot * 0.6);
      const scale = (height - pad * 2) / max;

      let out = `<text x="${pad - 8}" y="${pad + 4}" text-anchor="end">${max}</text>`;
      out += `<text x="${pad - 8}" y="${height - pad + 4}" text-anchor="end">0</text>`;
      series.categories.forEach((category, i) => {
        const x = pad + slot * i + (slot - barWidth) / 2;
        let y = height - pad;
        series.values[i].forEach((value, j) => {
          if (!value) {
            return;
          }
          const h = value * scale;
          y -= h;
          const colorIndex = allLabels.indexOf(series.labels[j]);
          out += `<rect x="${x}" y="${y}" width="${barWidth}" height="${h}" fill="${color(colorIndex)}" />`;
        });
        out += `<text x="${x + barWidth / 2}" y="${height - pad + 16}" text-anchor="middle">${escapeText(category)}</text>`;
      });
      svg.innerHTML = out;
    };

    const loadStats = async () => {
      const res = await fetch('/api/stats');
      if (!res.ok) {
        throw new Error('Unable to load stats');
      }
      const stats = await res.json();
      if (!stats.total) {
        chartsEl.hidden = true;
        return;
      }
      chartsEl.hidden = false;
      const allLabels = stats.proportions.map((share) => share.label);
      renderPie(stats.proportions);
      renderStacked('by-date', stats.by_date, allLabels);
      renderStacked('by-weekday', stats.by_weekday, allLabels);
      renderLegend(document.getElementById('bar-legend'), allLabels);
    };

    const form = document.getElementById('save-form');
    form.addEventListener('submit', async (event) => {
      event.preventDefault();
      setStatus('Saving...', '');
      try {
        const res = await fetch('/api/save', { method: 'POST', body: new FormData(form) });
        if (!res.ok) {
          throw new Error((await res.text()) || 'Save failed');
        }
        const saved = await res.json();
        const note = saved.csv_persisted ? '' : ' (CSV could not be written)';
        setStatus(`Saved '${saved.label}'. ${saved.count} recorded for this food.${note}`, 'ok');
        form.reset();
      } catch (err) {
        setStatus(err.message, 'error');
      }
      loadStats().catch((err) => setStatus(err.message, 'error'));
    });

    loadStats().catch((err) => setStatus(err.message, 'error'));
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_status_shows_running_count() {
        let html = render_index(
            &PageStatus::Saved {
                label: "apple".into(),
                count: 3,
            },
            "food_log.csv",
        );
        assert!(html.contains("Saved &#39;apple&#39;. 3 recorded for this food."));
        assert!(html.contains(r#"data-type="ok""#));
        assert!(html.contains("<code>food_log.csv</code>"));
    }

    #[test]
    fn status_text_is_escaped() {
        let html = render_index(
            &PageStatus::Warning("<script>alert(1)</script>".into()),
            "food_log.csv",
        );
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn idle_page_has_no_placeholders_left() {
        let html = render_index(&PageStatus::Idle, "food_log.csv");
        assert!(!html.contains("{{"));
    }
}
