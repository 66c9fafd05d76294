use actix_web::{HttpResponse, Responder, web};

use crate::usage::{SnapshotStore, UsageSnapshot};

/// Usage dashboard: totals, per-tenant list sorted by size descending
/// and a horizontal bar chart of the same data.
pub async fn index(store: web::Data<SnapshotStore>) -> impl Responder {
    let snapshot = store.current();
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(render(&snapshot))
}

fn render(snapshot: &UsageSnapshot) -> String {
    let entries = snapshot.sorted_by_size();
    let labels: Vec<&str> = entries.iter().map(|(name, _)| *name).collect();
    let values: Vec<f64> = entries.iter().map(|(_, size)| *size).collect();

    let labels_json = serde_json::to_string(&labels).unwrap_or_else(|_| "[]".to_string());
    let values_json = serde_json::to_string(&values).unwrap_or_else(|_| "[]".to_string());

    let rows: String = entries
        .iter()
        .map(|(name, size)| format!("            <li>{}: {} MB</li>\n", escape(name), size))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Directory Sizes</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
</head>
<body>
    <h1>Directory Sizes</h1>
    <div class="d_sizes_wp">
        <div class="summary">
            <p>Total Size: {total_gb:.2} GB</p>
            <p>Usage: {usage:.2}%</p>
            <p>Last updated at: {last_updated}</p>
        </div>
        <canvas id="sizeChart" width="400" height="400"></canvas>
        <div class="d_sizes_list">
            <ul>
{rows}            </ul>
        </div>
    </div>
    <script>
        const ctx = document.getElementById('sizeChart').getContext('2d');
        new Chart(ctx, {{
            type: 'bar',
            data: {{
                labels: {labels_json},
                datasets: [{{
                    label: 'Directory Sizes (MB)',
                    data: {values_json},
                    backgroundColor: 'rgba(75, 192, 192, 0.2)',
                    borderColor: 'rgba(75, 192, 192, 1)',
                    borderWidth: 1
                }}]
            }},
            options: {{
                indexAxis: 'y',
                scales: {{
                    x: {{
                        beginAtZero: true
                    }}
                }}
            }}
        }});
    </script>
</body>
</html>
"#,
        total_gb = snapshot.total_size_gb,
        usage = snapshot.usage_percentage,
        last_updated = snapshot.last_updated_label(),
        rows = rows,
        labels_json = labels_json,
        values_json = values_json,
    )
}

/// Minimal HTML escaping for tenant names.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
