//! Page View - 单页界面渲染
//!
//! 页面组成：标题、可展开的说明面板、描述输入框、时长滑块、
//! 输入回显 JSON、音频播放器、下载链接。表单以 GET 提交，
//! 每次交互都是一次独立的整页渲染。

use serde::Serialize;

use crate::application::RenderedAudio;

/// 页面标题
pub const PAGE_TITLE: &str = "Music Gen";

/// 生成失败时的提示
pub const GENERATION_FAILED_MESSAGE: &str = "Music generation failed. Please check the logs.";

/// 页面中的生成结果
#[derive(Debug, Clone)]
pub enum PageResult {
    Generated(RenderedAudio),
    Failed { load_error: Option<String> },
}

/// 页面渲染所需的全部状态
#[derive(Debug, Clone)]
pub struct PageView {
    pub description: String,
    pub duration: u32,
    pub max_duration: u32,
    pub model_name: String,
    pub result: Option<PageResult>,
}

/// 输入回显
#[derive(Serialize)]
struct InputEcho<'a> {
    #[serde(rename = "Your Description")]
    description: &'a str,
    #[serde(rename = "Selected Time Duration (in Seconds)")]
    duration: u32,
}

/// HTML 转义
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

fn render_result(view: &PageView, result: &PageResult) -> String {
    let echo = serde_json::to_string_pretty(&InputEcho {
        description: &view.description,
        duration: view.duration,
    })
    .unwrap_or_default();

    let body = match result {
        PageResult::Generated(audio) => format!(
            r#"<audio controls src="{player_src}"></audio>
    <p class="caption">{channels} ch · {sample_rate} Hz · {duration_ms} ms</p>
    <a class="download" href="{download_href}" download="{file_name}">Download Audio</a>"#,
            player_src = audio.player_src,
            channels = audio.info.channels,
            sample_rate = audio.info.sample_rate,
            duration_ms = audio.info.duration_ms,
            download_href = audio.download_href,
            file_name = escape_html(&audio.file_name),
        ),
        PageResult::Failed { load_error } => {
            let mut errors = String::new();
            if let Some(load_error) = load_error {
                errors.push_str(&format!(
                    "<div class=\"error\">{}</div>\n    ",
                    escape_html(load_error)
                ));
            }
            errors.push_str(&format!(
                "<div class=\"error\">{}</div>",
                GENERATION_FAILED_MESSAGE
            ));
            errors
        }
    };

    format!(
        r#"<pre class="json">{echo}</pre>
    <h3>Generated Music</h3>
    {body}"#,
        echo = escape_html(&echo),
        body = body,
    )
}

/// 渲染整页 HTML
pub fn render_page(view: &PageView) -> String {
    let result = view
        .result
        .as_ref()
        .map(|r| render_result(view, r))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="icon" href="data:image/svg+xml,<svg xmlns=%22http://www.w3.org/2000/svg%22 viewBox=%220 0 100 100%22><text y=%22.9em%22 font-size=%2290%22>🎵</text></svg>">
    <style>
        body {{
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            max-width: 720px;
            margin: 40px auto;
            padding: 0 20px;
            color: #262730;
        }}
        textarea {{
            width: 100%;
            min-height: 100px;
        }}
        input[type=range] {{
            width: 100%;
        }}
        details {{
            border: 1px solid #ddd;
            border-radius: 6px;
            padding: 8px 12px;
            margin-bottom: 20px;
        }}
        pre.json {{
            background: #f6f6f9;
            padding: 12px;
            border-radius: 6px;
        }}
        .error {{
            background: #ffe9e9;
            color: #9b1c1c;
            padding: 12px;
            border-radius: 6px;
            margin-bottom: 8px;
        }}
        .caption {{
            color: #888;
            font-size: 13px;
        }}
    </style>
</head>
<body>
    <h1>Text to Music Generator🎵</h1>
    <details>
        <summary>See explanation</summary>
        <p>Music Generator app built on a pretrained text-to-music model. We are using the <code>{model_name}</code> model.</p>
    </details>
    <form method="get" action="/">
        <label for="description">Enter your description...</label>
        <textarea id="description" name="description">{description}</textarea>
        <label for="duration">Select time duration (In Seconds): <output id="duration-value">{duration}</output></label>
        <input type="range" id="duration" name="duration" min="0" max="{max_duration}" step="1" value="{duration}"
               oninput="document.getElementById('duration-value').value = this.value">
        <button type="submit">Generate</button>
    </form>
    {result}
</body>
</html>"#,
        title = PAGE_TITLE,
        model_name = escape_html(&view.model_name),
        description = escape_html(&view.description),
        duration = view.duration,
        max_duration = view.max_duration,
        result = result,
    )
}
