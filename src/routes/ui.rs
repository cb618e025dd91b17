use axum::{extract::State, response::Html, routing::get, Router};

use crate::models::AppState;

pub fn router(state: AppState) -> Router {
    Router::new().route("/", get(index)).with_state(state)
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(&state.config.app.name, state.config.app.max_file_size_mb))
}

fn render_index(app_name: &str, max_file_size_mb: u64) -> String {
    INDEX_TEMPLATE
        .replace("{{APP_NAME}}", &escape_html(app_name))
        .replace("{{MAX_FILE_SIZE_MB}}", &max_file_size_mb.to_string())
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const INDEX_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>{{APP_NAME}}</title>
  <style>
    body { font-family: Arial, sans-serif; margin: 2rem; color: #1d1d1f; display: flex; gap: 2rem; }
    aside { width: 280px; flex-shrink: 0; }
    main { flex-grow: 1; }
    .card { border: 1px solid #ddd; padding: 1rem; border-radius: 8px; margin-bottom: 1rem; }
    label { display: block; margin-top: 0.75rem; font-weight: 600; }
    input, select, textarea { width: 100%; padding: 0.5rem; box-sizing: border-box; }
    button { margin-top: 1rem; padding: 0.6rem 1rem; }
    pre { background: #f6f8fa; padding: 1rem; overflow: auto; white-space: pre-wrap; }
    .msg { padding: 0.5rem 0.75rem; margin: 0.5rem 0; border-radius: 6px; white-space: pre-wrap; }
    .user { background: #eef4ff; }
    .assistant { background: #f6f8fa; }
    .error { color: #b00020; }
    .hidden { display: none; }
  </style>
</head>
<body>
  <aside>
    <div class="card">
      <h2>Upload Document</h2>
      <input id="fileInput" type="file" accept=".pdf,.txt" />
      <small>Max file size: {{MAX_FILE_SIZE_MB}}MB</small>
      <button id="uploadBtn">Upload</button>
      <div id="uploadStatus"></div>
    </div>
    <div class="card">
      <h2>Options</h2>
      <label>Analysis Type</label>
      <select id="mode">
        <option value="qa">Q&amp;A</option>
        <option value="summary">Summary</option>
        <option value="key_points">Key Points</option>
        <option value="report">Report</option>
      </select>
      <button id="clearBtn">Clear Chat</button>
    </div>
  </aside>

  <main>
    <h1>{{APP_NAME}}</h1>
    <p>Upload a document and ask questions or get AI-powered analysis</p>

    <div id="onboarding" class="card">
      <h3>How to use:</h3>
      <ol>
        <li>Upload a PDF or TXT file using the sidebar</li>
        <li>Choose your analysis type</li>
        <li>Ask questions or use quick actions</li>
      </ol>
    </div>

    <div id="workspace" class="hidden">
      <details class="card">
        <summary>Document Preview</summary>
        <pre id="preview"></pre>
      </details>

      <h2>Chat with your document</h2>
      <div id="transcript"></div>
      <div id="error" class="error"></div>
      <textarea id="question" rows="3" placeholder="Ask a question about your document..."></textarea>
      <button id="sendBtn">Send</button>

      <div class="card">
        <button data-action="summary">Get Summary</button>
        <button data-action="key-points">Extract Key Points</button>
        <button data-action="report">Generate Report</button>
      </div>
    </div>
  </main>

  <script>
    let sessionId = null;
    let busy = false;

    async function api(path, options = {}) {
      const res = await fetch(path, options);
      const body = res.status === 204 ? null : await res.json();
      if (!res.ok) {
        throw new Error(body && body.error ? body.error : res.statusText);
      }
      return body;
    }

    async function ensureSession() {
      if (!sessionId) {
        sessionId = (await api('/api/sessions', { method: 'POST' })).session_id;
      }
      return sessionId;
    }

    function render(view) {
      const loaded = view.phase === 'document_loaded';
      document.getElementById('onboarding').classList.toggle('hidden', loaded);
      document.getElementById('workspace').classList.toggle('hidden', !loaded);
      if (view.document) {
        document.getElementById('preview').textContent = view.document.preview;
      }
      const transcript = document.getElementById('transcript');
      transcript.innerHTML = '';
      for (const message of view.messages) {
        const div = document.createElement('div');
        div.className = 'msg ' + message.role;
        div.textContent = message.content;
        transcript.appendChild(div);
      }
    }

    async function refresh() {
      render(await api('/api/sessions/' + sessionId));
    }

    async function run(task) {
      if (busy) return;
      busy = true;
      document.getElementById('error').textContent = '';
      try {
        await task();
      } catch (e) {
        document.getElementById('error').textContent = 'Error: ' + e.message;
      } finally {
        busy = false;
      }
    }

    document.getElementById('uploadBtn').addEventListener('click', () => run(async () => {
      const fileInput = document.getElementById('fileInput');
      const status = document.getElementById('uploadStatus');
      if (!fileInput.files.length) {
        status.textContent = 'Select a file first.';
        return;
      }
      await ensureSession();
      const formData = new FormData();
      formData.append('file', fileInput.files[0]);
      status.textContent = 'Processing document...';
      try {
        const info = await api('/api/sessions/' + sessionId + '/document', { method: 'POST', body: formData });
        status.textContent = 'Document loaded successfully! ' + info.characters + ' characters extracted';
      } catch (e) {
        status.textContent = 'Error processing file: ' + e.message;
        return;
      }
      await refresh();
    }));

    document.getElementById('sendBtn').addEventListener('click', () => run(async () => {
      const question = document.getElementById('question');
      if (!question.value.trim()) return;
      await api('/api/sessions/' + sessionId + '/chat', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ message: question.value, mode: document.getElementById('mode').value })
      });
      question.value = '';
      await refresh();
    }));

    for (const button of document.querySelectorAll('[data-action]')) {
      button.addEventListener('click', () => run(async () => {
        await api('/api/sessions/' + sessionId + '/' + button.dataset.action, { method: 'POST' });
        await refresh();
      }));
    }

    document.getElementById('clearBtn').addEventListener('click', () => run(async () => {
      if (!sessionId) return;
      render(await api('/api/sessions/' + sessionId + '/history', { method: 'DELETE' }));
    }));

    window.addEventListener('pagehide', () => {
      if (sessionId) {
        fetch('/api/sessions/' + sessionId, { method: 'DELETE', keepalive: true });
      }
    });
  </script>
</body>
</html>"#;
