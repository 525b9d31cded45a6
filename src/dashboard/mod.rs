//! Live metrics dashboard.
//!
//! A single static page, embedded at compile time, that polls `GET /metrics`
//! once a second and renders the snapshot. The camelCase field names in the
//! snapshot JSON are the contract between this page and the metrics endpoint.

pub const DASHBOARD_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Proxy Metrics</title>
  <style>
    body { font-family: Arial, sans-serif; background: #0f172a; color: #e5e7eb; }
    .card {
      background: #111827;
      padding: 20px;
      border-radius: 10px;
      width: 320px;
      margin: 50px auto;
      box-shadow: 0 0 20px rgba(0,0,0,0.4);
    }
    h2 { text-align: center; }
    p { font-size: 18px; }
  </style>
</head>
<body>
  <div class="card">
    <h2>Proxy Metrics</h2>
    <p>Total Requests: <span id="total-requests"></span></p>
    <p>Active Requests: <span id="active-requests"></span></p>
    <p>Total Errors: <span id="total-errors"></span></p>
    <p>Avg Response Time (ms): <span id="avg-response-time"></span></p>
  </div>

  <script>
    async function refresh() {
      const response = await fetch('/metrics');
      const snapshot = await response.json();
      document.getElementById('total-requests').innerText = snapshot.totalRequests;
      document.getElementById('active-requests').innerText = snapshot.activeRequests;
      document.getElementById('total-errors').innerText = snapshot.totalErrors;
      document.getElementById('avg-response-time').innerText = snapshot.averageResponseTimeMs;
    }
    setInterval(refresh, 1000);
    refresh();
  </script>
</body>
</html>
"#;
