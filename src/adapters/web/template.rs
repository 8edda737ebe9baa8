//! Server-rendered search page.
//!
//! The page is a single HTML document with `{{PLACEHOLDER}}` markers that
//! [`render_index`] fills in. Every interpolated value is HTML-escaped.

use crate::domain::constants::{field_display_name, SORTABLE_FIELDS};
use crate::domain::model::SearchType;

/// Values the index page is rendered from.
#[derive(Debug, Clone)]
pub struct IndexContext<'a> {
    pub tool_name: &'a str,
    pub search_types: &'a [SearchType],
    pub max_results: u32,
    pub default_sort_field: &'a str,
}

pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn option(value: &str, label: &str, selected: bool) -> String {
    format!(
        r#"<option value="{}"{}>{}</option>"#,
        html_escape(value),
        if selected { " selected" } else { "" },
        html_escape(label)
    )
}

/// 搜尋類型選單：value 為識別字，顯示名稱為 Title Case
fn search_type_options(search_types: &[SearchType]) -> String {
    search_types
        .iter()
        .enumerate()
        .map(|(i, t)| option(t.as_str(), &t.display_name(), i == 0))
        .collect::<Vec<_>>()
        .join("\n            ")
}

fn sort_field_options(default_sort_field: &str) -> String {
    let mut fields: Vec<&str> = SORTABLE_FIELDS.to_vec();
    if !fields.contains(&default_sort_field) {
        fields.insert(0, default_sort_field);
    }
    fields
        .iter()
        .map(|f| option(f, field_display_name(f), *f == default_sort_field))
        .collect::<Vec<_>>()
        .join("\n            ")
}

fn results_per_page_options(max_results: u32) -> String {
    let mut sizes: Vec<u32> = [10, 25, 50, 100]
        .into_iter()
        .filter(|n| *n <= max_results)
        .collect();
    if !sizes.contains(&max_results) {
        sizes.push(max_results);
    }
    let default = sizes.iter().copied().find(|n| *n == 25).unwrap_or(sizes[0]);
    sizes
        .iter()
        .map(|n| option(&n.to_string(), &n.to_string(), *n == default))
        .collect::<Vec<_>>()
        .join("\n            ")
}

pub fn render_index(ctx: &IndexContext<'_>) -> String {
    INDEX_HTML
        .replace("{{TOOL_NAME}}", &html_escape(ctx.tool_name))
        .replace("{{SEARCH_TYPE_OPTIONS}}", &search_type_options(ctx.search_types))
        .replace("{{SORT_FIELD_OPTIONS}}", &sort_field_options(ctx.default_sort_field))
        .replace(
            "{{RESULTS_PER_PAGE_OPTIONS}}",
            &results_per_page_options(ctx.max_results),
        )
        .replace("{{MAX_RESULTS}}", &ctx.max_results.to_string())
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{{TOOL_NAME}}</title>
  <style>
    * { box-sizing: border-box; }
    body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #f5f5f5; margin: 0; padding: 20px; color: #333; }
    .container { max-width: 1100px; margin: 0 auto; background: #fff; border: 1px solid #e0e0e0; border-radius: 8px; padding: 24px; }
    h1 { font-size: 24px; margin: 0 0 20px; }
    .hidden { display: none !important; }
    .form-row { display: flex; gap: 16px; flex-wrap: wrap; margin-bottom: 14px; }
    .form-group { display: flex; flex-direction: column; gap: 4px; min-width: 200px; flex: 1; }
    label { font-size: 13px; font-weight: 600; }
    input, select { padding: 8px; border: 1px solid #ccc; border-radius: 4px; font-size: 14px; }
    .checkbox { flex-direction: row; align-items: center; gap: 8px; }
    .buttons { display: flex; gap: 10px; margin-top: 10px; }
    button { padding: 9px 18px; border: none; border-radius: 4px; cursor: pointer; font-size: 14px; }
    button.primary { background: #1a73e8; color: #fff; }
    button.secondary { background: #e0e0e0; }
    button:disabled { opacity: 0.6; cursor: default; }
    .spinner { display: inline-block; width: 14px; height: 14px; border: 2px solid #fff; border-top-color: transparent; border-radius: 50%; animation: spin 0.8s linear infinite; vertical-align: middle; }
    @keyframes spin { to { transform: rotate(360deg); } }
    .panel { background: #fafafa; border: 1px solid #e0e0e0; border-radius: 4px; padding: 12px; margin-top: 14px; }
    .panel pre { margin: 0; max-height: 300px; overflow: auto; font-size: 12px; }
    .error { color: #c62828; margin-top: 12px; }
    table { width: 100%; border-collapse: collapse; margin-top: 12px; font-size: 14px; }
    th, td { border-bottom: 1px solid #eee; padding: 8px; text-align: left; }
    th { background: #f0f0f0; }
    .pagination { display: flex; align-items: center; gap: 12px; margin-top: 12px; }
  </style>
</head>
<body>
  <div class="container">
    <h1>{{TOOL_NAME}}</h1>

    <form id="searchForm">
      <div class="form-row">
        <div class="form-group">
          <label for="searchType">Search Type</label>
          <select id="searchType" name="search_type">
            {{SEARCH_TYPE_OPTIONS}}
          </select>
        </div>
      </div>

      <div class="form-row" id="simpleFields">
        <div class="form-group">
          <label for="simpleTerm">Search Term</label>
          <input type="text" id="simpleTerm" name="term" placeholder="e.g. lithium battery" required>
        </div>
      </div>

      <div class="form-row hidden" id="advancedFields">
        <div class="form-group">
          <label for="fieldName">Field</label>
          <select id="fieldName" name="field"></select>
        </div>
        <div class="form-group">
          <label for="fieldValue">Value</label>
          <input type="text" id="fieldValue" name="value">
        </div>
        <div class="form-group hidden" id="booleanOperatorGroup">
          <label for="booleanOperator">Operator</label>
          <select id="booleanOperator" name="operator">
            <option value="AND">AND</option>
            <option value="OR">OR</option>
            <option value="NOT">NOT</option>
          </select>
        </div>
        <div class="form-group hidden" id="rangeGroup">
          <label for="valueFrom">From / To</label>
          <input type="text" id="valueFrom" name="valueFrom">
          <input type="text" id="valueTo" name="valueTo">
        </div>
      </div>

      <div class="form-row">
        <div class="form-group checkbox">
          <input type="checkbox" id="useDateRange">
          <label for="useDateRange">Filter by filing date</label>
        </div>
      </div>

      <div class="form-row hidden" id="dateRangeFields">
        <div class="form-group">
          <label for="dateFrom">Filed From</label>
          <input type="date" id="dateFrom" name="dateFrom">
        </div>
        <div class="form-group">
          <label for="dateTo">Filed To</label>
          <input type="date" id="dateTo" name="dateTo">
        </div>
      </div>

      <div class="form-row">
        <div class="form-group">
          <label for="resultsPerPage">Results Per Page (max {{MAX_RESULTS}})</label>
          <select id="resultsPerPage" name="limit">
            {{RESULTS_PER_PAGE_OPTIONS}}
          </select>
        </div>
        <div class="form-group">
          <label for="sortField">Sort By</label>
          <select id="sortField" name="sort_field">
            {{SORT_FIELD_OPTIONS}}
          </select>
        </div>
        <div class="form-group">
          <label for="sortOrder">Order</label>
          <select id="sortOrder" name="sort_order">
            <option value="desc" selected>Descending</option>
            <option value="asc">Ascending</option>
          </select>
        </div>
      </div>

      <div class="form-row">
        <div class="form-group checkbox">
          <input type="checkbox" id="enableDebug">
          <label for="enableDebug">Enable Debug Mode</label>
        </div>
        <div class="form-group checkbox">
          <input type="checkbox" id="showQueryPreview">
          <label for="showQueryPreview">Show Query Preview</label>
        </div>
      </div>

      <div class="buttons">
        <button type="submit" class="primary" id="searchButton">Search</button>
        <button type="reset" class="secondary" id="resetButton">Reset</button>
        <button type="button" class="secondary" id="testConnectionBtn">Test API Connection</button>
      </div>
    </form>

    <div id="queryPreviewPanel" class="panel hidden">
      <strong>Query Preview</strong>
      <pre id="queryPreview"></pre>
    </div>

    <div id="debugPanel" class="panel hidden">
      <strong>Debug</strong>
      <pre id="debugRequest"></pre>
      <pre id="debugResponse"></pre>
    </div>

    <div id="statusMessage" class="error hidden"></div>

    <div id="resultsSection" class="hidden">
      <div class="pagination">
        <span id="resultCount"></span>
        <button type="button" class="secondary" id="exportCsvBtn">Export CSV</button>
      </div>
      <table id="resultsTable">
        <thead>
          <tr><th>Title</th><th>Application Number</th><th>Filing Date</th><th>Inventor</th><th>Status</th></tr>
        </thead>
        <tbody></tbody>
      </table>
      <div class="pagination" id="paginationControls">
        <button type="button" class="secondary" id="prevPage">Previous</button>
        <span id="pageInfo"></span>
        <button type="button" class="secondary" id="nextPage">Next</button>
      </div>
    </div>
  </div>

  <script>
    (function () {
      const $ = (id) => document.getElementById(id);
      const form = $('searchForm');
      const searchButton = $('searchButton');
      const buttonLabel = searchButton.innerHTML;
      let currentPage = 1;
      let lastResults = [];
      let lastTotal = 0;

      function toggle(checkbox, target) {
        checkbox.addEventListener('change', () => {
          target.classList.toggle('hidden', !checkbox.checked);
        });
      }
      toggle($('enableDebug'), $('debugPanel'));
      toggle($('showQueryPreview'), $('queryPreviewPanel'));
      toggle($('useDateRange'), $('dateRangeFields'));

      async function loadFields(searchType) {
        const resp = await fetch('/api/valid-fields/' + encodeURIComponent(searchType));
        const body = await resp.json();
        const select = $('fieldName');
        select.innerHTML = '';
        (body.fields || []).forEach((f) => {
          const opt = document.createElement('option');
          opt.value = f.field;
          opt.textContent = f.display_name;
          select.appendChild(opt);
        });
      }

      function updateFieldGroups() {
        const type = $('searchType').value;
        const simple = type === 'simple';
        $('simpleFields').classList.toggle('hidden', !simple);
        $('simpleTerm').required = simple;
        $('advancedFields').classList.toggle('hidden', simple);
        $('booleanOperatorGroup').classList.toggle('hidden', type !== 'boolean');
        $('rangeGroup').classList.toggle('hidden', type !== 'range');
        if (!simple) { loadFields(type); }
      }
      $('searchType').addEventListener('change', updateFieldGroups);

      function buildRequest(page) {
        const type = $('searchType').value;
        const q = {};
        if (type === 'simple') {
          q.term = $('simpleTerm').value;
        } else if (type === 'boolean') {
          q.terms = [{ field: $('fieldName').value, value: $('fieldValue').value, operator: $('booleanOperator').value }];
        } else if (type === 'range') {
          q.field = $('fieldName').value;
          q.valueFrom = $('valueFrom').value;
          q.valueTo = $('valueTo').value;
        } else if (type === 'faceted') {
          q.facets = [$('fieldName').value];
        } else {
          q.field = $('fieldName').value;
          q.value = $('fieldValue').value;
        }
        if ($('useDateRange').checked) {
          q.dateFrom = $('dateFrom').value;
          q.dateTo = $('dateTo').value;
        }
        return {
          search_type: type,
          query_params: q,
          page: page,
          limit: parseInt($('resultsPerPage').value, 10),
          sort_field: $('sortField').value,
          sort_order: $('sortOrder').value
        };
      }

      async function postJson(url, body) {
        const resp = await fetch(url, {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify(body)
        });
        return resp.json();
      }

      async function refreshPreview() {
        if (!$('showQueryPreview').checked) { return; }
        const body = await postJson('/api/preview-query', buildRequest(currentPage));
        $('queryPreview').textContent = JSON.stringify(body.success ? body.query : body, null, 2);
      }
      form.addEventListener('input', refreshPreview);
      $('showQueryPreview').addEventListener('change', refreshPreview);

      function showError(message) {
        const el = $('statusMessage');
        el.textContent = message || '';
        el.classList.toggle('hidden', !message);
      }

      function text(record, path) {
        let v = record;
        for (const key of path.split('.')) { v = v == null ? undefined : v[key]; }
        return v == null ? '' : String(v);
      }

      function inventor(record) {
        const first = text(record, 'applicationMetaData.firstInventorName');
        if (first) { return first; }
        const bag = (record.applicationMetaData || {}).inventorBag || [];
        const names = bag.map((i) => i.inventorNameText).filter(Boolean);
        return names.length ? names.join('; ') : text(record, 'inventorNameText');
      }

      function renderResults(results, total, limit) {
        const tbody = $('resultsTable').querySelector('tbody');
        tbody.innerHTML = '';
        results.forEach((r) => {
          const tr = document.createElement('tr');
          [
            text(r, 'applicationMetaData.inventionTitle') || text(r, 'inventionTitle'),
            text(r, 'applicationNumberText'),
            text(r, 'applicationMetaData.filingDate'),
            inventor(r),
            text(r, 'applicationMetaData.applicationStatusDescriptionText')
          ].forEach((value) => {
            const td = document.createElement('td');
            td.textContent = value;
            tr.appendChild(td);
          });
          tbody.appendChild(tr);
        });
        const pages = Math.max(1, Math.ceil(total / limit));
        $('resultCount').textContent = total + ' matching applications';
        $('pageInfo').textContent = 'Page ' + currentPage + ' of ' + pages;
        $('prevPage').disabled = currentPage <= 1;
        $('nextPage').disabled = currentPage >= pages;
      }

      async function runSearch(page) {
        const request = buildRequest(page);
        searchButton.disabled = true;
        searchButton.innerHTML = '<span class="spinner"></span> Searching...';
        showError('');
        try {
          $('debugRequest').textContent = JSON.stringify(request, null, 2);
          const body = await postJson('/api/search', request);
          $('debugResponse').textContent = JSON.stringify(body, null, 2);
          if (!body.success) {
            showError(body.error);
            return;
          }
          currentPage = page;
          lastResults = body.data.results || [];
          lastTotal = body.data.count || 0;
          renderResults(lastResults, lastTotal, request.limit);
          $('resultsSection').classList.remove('hidden');
        } catch (err) {
          showError('Search failed: ' + err);
        } finally {
          searchButton.disabled = false;
          searchButton.innerHTML = buttonLabel;
        }
      }

      form.addEventListener('submit', (e) => {
        e.preventDefault();
        runSearch(1);
      });
      $('prevPage').addEventListener('click', () => runSearch(currentPage - 1));
      $('nextPage').addEventListener('click', () => runSearch(currentPage + 1));

      form.addEventListener('reset', () => {
        setTimeout(() => {
          $('resultsSection').classList.add('hidden');
          $('dateRangeFields').classList.add('hidden');
          $('debugPanel').classList.add('hidden');
          $('queryPreviewPanel').classList.add('hidden');
          showError('');
          currentPage = 1;
          lastResults = [];
          lastTotal = 0;
          updateFieldGroups();
        }, 0);
      });

      $('exportCsvBtn').addEventListener('click', async () => {
        const resp = await fetch('/api/export-csv', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify({ results: lastResults })
        });
        if (!resp.ok) {
          const body = await resp.json();
          showError(body.error);
          return;
        }
        const disposition = resp.headers.get('Content-Disposition') || '';
        const match = disposition.match(/filename="([^"]+)"/);
        const link = document.createElement('a');
        link.href = URL.createObjectURL(await resp.blob());
        link.download = match ? match[1] : 'patent_search_results.csv';
        link.click();
        URL.revokeObjectURL(link.href);
      });

      $('testConnectionBtn').addEventListener('click', async () => {
        const resp = await fetch('/api/test-connection');
        const body = await resp.json();
        alert(body.success ? body.message : body.error);
      });

      updateFieldGroups();
    })();
  </script>
</body>
</html>
"##;
