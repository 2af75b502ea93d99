//! Requester dashboard (`requesters.html`).
//!
//! The page is a single file: chart series, the table, and the drill-down
//! map are all inlined, and only the chart/table libraries come from a CDN.

use crate::aggregate::requester::{RequesterReport, RequesterSummary, RequesterType};
use crate::domain::{NAVIGATION_TARGET, REPORT_VERSION};
use anyhow::Result;
use serde::Serialize;
use serde_json::json;

const HEBREW_TABLE_I18N: &str = r#"{"sProcessing": "מעבד...", "sLengthMenu": "הצג _MENU_ פריטים", "sZeroRecords": "לא נמצאו רשומות", "sSearch": "חיפוש:", "oPaginate": {"sFirst": "ראשון", "sPrevious": "קודם", "sNext": "הבא", "sLast": "אחרון"}}"#;

const STYLE: &str = r#"
body { background-color: #f0f2f5; font-family: 'Segoe UI', Tahoma, sans-serif; padding: 15px; }
.main-card { background: white; padding: 25px; border-radius: 12px; box-shadow: 0 5px 20px rgba(0,0,0,0.05); margin-bottom: 20px; }
.header-row { display: flex; justify-content: space-between; align-items: center; margin-bottom: 20px; }
.header-meta { color: #9aa0a6; font-size: 0.75rem; font-family: monospace; }
.nav-btn { text-decoration: none; color: #1a73e8; border: 1px solid #1a73e8; padding: 5px 15px; border-radius: 20px; }
.chart-container { position: relative; height: 400px; width: 100%; }
.custom-legend { display: flex; gap: 20px; justify-content: center; margin-bottom: 15px; flex-wrap: wrap; }
.legend-item { cursor: pointer; padding: 5px 12px; border-radius: 20px; background: #f8f9fa; }
.legend-color { width: 12px; height: 12px; border-radius: 50%; display: inline-block; }
.active-filter { background: #e2e6ea; }
.interactive-count { cursor: help; text-decoration: underline dotted; color: #0d6efd; font-weight: bold; }
.clickable-name { color: #0d6efd; cursor: pointer; font-weight: 700; }
"#;

const SCRIPT: &str = r#"
let dataTable;
let detailedChart = null;

function filterTable(type, element) {
    $('.legend-item').removeClass('active-filter');
    $(element).addClass('active-filter');
    if (dataTable) { dataTable.column(1).search(type).draw(); }
}

function resetTableFilter() {
    $('.legend-item').removeClass('active-filter');
    if (dataTable) { dataTable.column(1).search('').draw(); }
}

function openRequesterModal(name) {
    const data = requesterDetails[name];
    if (!data) return;
    $('#requesterModalTitle').text('תיק מבקש: ' + name);

    const ctx = document.getElementById('requesterSpecificChart').getContext('2d');
    if (detailedChart) { detailedChart.destroy(); }
    const years = Object.keys(data.years).sort();
    detailedChart = new Chart(ctx, {
        type: 'bar',
        data: { labels: years, datasets: [{ label: 'מספר מסמכים', data: years.map(y => data.years[y]), backgroundColor: '#0d6efd' }] },
        options: { responsive: true, maintainAspectRatio: false, scales: { y: { beginAtZero: true, ticks: { stepSize: 1 } } } }
    });

    if ($.fn.DataTable.isDataTable('#requesterDocsTable')) { $('#requesterDocsTable').DataTable().destroy(); }
    const tbody = $('#requesterDocsTable tbody');
    tbody.empty();
    data.docs.forEach(doc => {
        const row = $('<tr>');
        row.append($('<td>').text(doc.date));
        row.append($('<td>').text(doc.title));
        const cell = $('<td>');
        if (doc.link) { cell.append($('<a target="_blank">').attr('href', doc.link).text('🔗 צפייה')); } else { cell.text('-'); }
        row.append(cell);
        tbody.append(row);
    });
    $('#requesterDocsTable').DataTable({ language: tableI18n, order: [[0, 'desc']], pageLength: 10 });
    new bootstrap.Modal(document.getElementById('singleRequesterModal')).show();
}

$(document).ready(function() {
    $('[data-bs-toggle="popover"]').popover({ trigger: 'hover', placement: 'auto' });
    dataTable = $('#requestersTable').DataTable({ language: tableI18n, order: [[2, 'desc']], pageLength: 15 });
    dataTable.on('draw', function () { $('[data-bs-toggle="popover"]').popover({ trigger: 'hover', placement: 'left' }); });
    $(document).on('click', '.clickable-name', function () { openRequesterModal($(this).attr('data-requester')); });

    const ctx = document.getElementById('requestersChart').getContext('2d');
    new Chart(ctx, {
        type: 'line',
        data: { labels: chartData.years, datasets: chartData.datasets },
        options: {
            responsive: true, maintainAspectRatio: false, interaction: { mode: 'index', intersect: false },
            plugins: { legend: { display: false }, tooltip: { callbacks: { label: c => c.dataset.label + ': ' + c.parsed.y + '%' } } },
            scales: { y: { beginAtZero: true, max: 100, ticks: { callback: v => v + '%' } } }
        }
    });
});
"#;

#[derive(Serialize)]
struct ChartDataset<'a> {
    label: &'a str,
    data: Vec<f64>,
    #[serde(rename = "borderColor")]
    border_color: &'a str,
    #[serde(rename = "backgroundColor")]
    background_color: &'a str,
    tension: f64,
    fill: bool,
}

fn type_color(kind: RequesterType) -> &'static str {
    match kind {
        RequesterType::ResearchCenter => "#0d6efd",
        RequesterType::Committees => "#ffc107",
        RequesterType::MembersAndOthers => "#198754",
    }
}

fn type_badge(kind: RequesterType) -> &'static str {
    match kind {
        RequesterType::ResearchCenter => "bg-primary",
        RequesterType::Committees => "bg-warning text-dark",
        RequesterType::MembersAndOthers => "bg-success",
    }
}

/// Render the requester dashboard. `generated_at` is shown in the header.
pub fn render_requesters_dashboard(report: &RequesterReport, generated_at: &str) -> Result<String> {
    let chart_data = chart_data(report);
    let details = serde_json::to_value(&report.details)?;

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"he\" dir=\"rtl\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n<title>ניתוח מבקשים</title>\n");
    html.push_str("<link rel=\"stylesheet\" href=\"https://cdn.datatables.net/1.13.6/css/jquery.dataTables.min.css\">\n");
    html.push_str("<link rel=\"stylesheet\" href=\"https://cdnjs.cloudflare.com/ajax/libs/bootstrap/5.3.0/css/bootstrap.rtl.min.css\">\n");
    html.push_str("<script src=\"https://cdn.jsdelivr.net/npm/chart.js\"></script>\n");
    html.push_str(&format!("<style>{STYLE}</style>\n</head>\n<body>\n"));

    html.push_str("<div class=\"main-card\">\n<div class=\"header-row\">\n");
    html.push_str(&format!(
        "<div><h2>📊 ניתוח מבקשי מחקרים</h2> <a href=\"{NAVIGATION_TARGET}\" class=\"nav-btn\">🔙 חזרה לראשי</a></div>\n"
    ));
    html.push_str(&format!(
        "<div class=\"header-meta\">Requesters v{REPORT_VERSION} {}</div>\n</div>\n",
        escape_html(generated_at)
    ));

    html.push_str("<h4>מגמות סוגי מבקשים לאורך השנים (באחוזים)</h4>\n<div class=\"custom-legend\">\n");
    for kind in RequesterType::ALL {
        html.push_str(&format!(
            "<div class=\"legend-item\" onclick=\"filterTable('{label}', this)\"><span class=\"legend-color\" style=\"background: {color};\"></span> <span>{label}</span> <span class=\"legend-count\">({count})</span></div>\n",
            label = kind.label(),
            color = type_color(kind),
            count = report.unique_count(kind),
        ));
    }
    html.push_str("<div class=\"legend-item\" onclick=\"resetTableFilter()\"><span>🔄 הצג הכל</span></div>\n</div>\n");
    html.push_str("<div class=\"chart-container\"><canvas id=\"requestersChart\"></canvas></div>\n</div>\n");

    html.push_str("<div class=\"main-card\">\n<h4>פירוט וסטטיסטיקה למבקשים</h4>\n");
    html.push_str("<table id=\"requestersTable\" class=\"display table table-sm table-hover\" style=\"width:100%\">\n<thead><tr>");
    for header in [
        "שם המבקש",
        "סיווג",
        "מסמכים",
        "משנה",
        "עד שנה",
        "טווח שנים",
        "שנים בטווח",
        "שנות פעילות",
        "ממוצע לשנה (מסמכים / שנים בטווח)",
        "מחברים",
        "ממוצע למחבר",
        "ראשי צוותים",
    ] {
        html.push_str(&format!("<th>{header}</th>"));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for row in &report.rows {
        html.push_str(&table_row(row));
    }
    html.push_str("</tbody>\n</table>\n</div>\n");

    html.push_str(MODAL);
    html.push_str("<script src=\"https://code.jquery.com/jquery-3.7.0.min.js\"></script>\n");
    html.push_str("<script src=\"https://cdn.datatables.net/1.13.6/js/jquery.dataTables.min.js\"></script>\n");
    html.push_str("<script src=\"https://cdnjs.cloudflare.com/ajax/libs/bootstrap/5.3.0/js/bootstrap.bundle.min.js\"></script>\n");
    html.push_str("<script>\n");
    html.push_str(&format!("const requesterDetails = {};\n", script_json(&details)?));
    html.push_str(&format!("const chartData = {};\n", script_json(&chart_data)?));
    html.push_str(&format!("const tableI18n = {HEBREW_TABLE_I18N};\n"));
    html.push_str(SCRIPT);
    html.push_str("</script>\n</body>\n</html>\n");

    Ok(html)
}

const MODAL: &str = r#"<div class="modal fade" id="singleRequesterModal" tabindex="-1" aria-hidden="true">
<div class="modal-dialog modal-xl modal-dialog-scrollable"><div class="modal-content">
<div class="modal-header"><h5 class="modal-title fw-bold" id="requesterModalTitle">פרטי מבקש</h5>
<button type="button" class="btn-close" data-bs-dismiss="modal" aria-label="Close"></button></div>
<div class="modal-body">
<div style="height: 300px;"><canvas id="requesterSpecificChart"></canvas></div>
<h5>📜 רשימת מסמכים</h5>
<table id="requesterDocsTable" class="table table-sm table-striped table-hover" style="width:100%">
<thead><tr><th>תאריך</th><th>כותרת המסמך</th><th>קישור</th></tr></thead><tbody></tbody></table>
</div>
<div class="modal-footer"><button type="button" class="btn btn-secondary" data-bs-dismiss="modal">סגור</button></div>
</div></div></div>
"#;

fn table_row(row: &RequesterSummary) -> String {
    let name = escape_html(&row.name);
    let year = |y: Option<i32>| y.map(|v| v.to_string()).unwrap_or_default();
    format!(
        "<tr><td class=\"fw-bold\"><span class=\"clickable-name\" data-requester=\"{name}\">{name}</span></td>\
<td><span class=\"badge {badge}\">{kind}</span></td>\
<td class=\"text-center fw-bold\">{count}</td>\
<td class=\"text-center\">{first}</td>\
<td class=\"text-center\">{last}</td>\
<td class=\"text-center\">{range}</td>\
<td class=\"text-center\">{span}</td>\
<td class=\"text-center\">{active}</td>\
<td class=\"text-center\">{avg_year:.1}</td>\
<td class=\"text-center\">{authors}</td>\
<td class=\"text-center\">{avg_author:.1}</td>\
<td class=\"text-center\">{leads}</td></tr>\n",
        badge = type_badge(row.kind),
        kind = row.kind.label(),
        count = row.doc_count,
        first = year(row.first_year),
        last = year(row.last_year),
        range = escape_html(&row.years_range),
        span = row.span_years,
        active = row.active_years,
        avg_year = row.avg_per_year,
        authors = popover_count("מחברים", &row.authors),
        avg_author = row.avg_per_author,
        leads = popover_count("ראשי צוותים", &row.team_leads),
    )
}

/// A count that reveals the underlying names on hover.
fn popover_count(title: &str, names: &[String]) -> String {
    if names.is_empty() {
        return "0".to_string();
    }
    format!(
        "<span class=\"interactive-count\" data-bs-toggle=\"popover\" title=\"{title} ({n})\" data-bs-content=\"{content}\">{n}</span>",
        n = names.len(),
        content = escape_html(&names.join(", ")),
    )
}

fn chart_data(report: &RequesterReport) -> serde_json::Value {
    let years: Vec<i32> = report.yearly.iter().map(|y| y.year).collect();
    let series = |kind: RequesterType| -> Vec<f64> {
        report
            .yearly
            .iter()
            .map(|y| match kind {
                RequesterType::ResearchCenter => y.research_center,
                RequesterType::Committees => y.committees,
                RequesterType::MembersAndOthers => y.others,
            })
            .collect()
    };
    let datasets: Vec<ChartDataset> = RequesterType::ALL
        .into_iter()
        .map(|kind| ChartDataset {
            label: kind.label(),
            data: series(kind),
            border_color: type_color(kind),
            background_color: type_color(kind),
            tension: 0.3,
            fill: false,
        })
        .collect();
    json!({ "years": years, "datasets": datasets })
}

pub fn escape_html(text: &str) -> String {
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

/// JSON safe to embed inside a `<script>` element.
fn script_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}
