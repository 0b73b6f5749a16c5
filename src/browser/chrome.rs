//! headless_chrome によるセッション実装
//!
//! フレーム切り替えはCDPに直接の手段がないため、フレーム内では
//! `iframe.contentDocument` を起点にしたスクリプトで要素を操作する（同一オリジンのみ）。

use super::{ElementInfo, Session};
use crate::config::Config;
use crate::error::{Result, ScrapeError};
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

pub struct ChromeSession {
    // タブより先に破棄されないよう保持
    _browser: Browser,
    tab: Arc<Tab>,
    frame: Option<String>,
}

fn js_str(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".into())
}

impl ChromeSession {
    pub fn launch(config: &Config) -> Result<Self> {
        let options = LaunchOptions::default_builder()
            .headless(config.headless)
            .window_size(Some((1920, 1080)))
            .idle_browser_timeout(Duration::from_secs(600))
            .build()
            .map_err(|e| ScrapeError::Browser(e.to_string()))?;

        let browser = Browser::new(options)?;
        let tab = browser.new_tab()?;
        tab.set_user_agent(&config.user_agent, None, None)?;

        tracing::debug!(headless = config.headless, "browser launched");
        Ok(Self { _browser: browser, tab, frame: None })
    }

    fn doc_expr(&self) -> String {
        match &self.frame {
            Some(sel) => format!(
                "(function(){{var f=document.querySelector({});try{{return f?f.contentDocument:null;}}catch(e){{return null;}}}})()",
                js_str(sel)
            ),
            None => "document".into(),
        }
    }

    /// `doc` を起点に `body` を実行し、JSON文字列の戻り値をパース
    fn eval_in(&self, doc: &str, body: &str) -> Result<Value> {
        let script = format!(
            "(function(){{var doc={};if(!doc){{return JSON.stringify({{detached:true}});}}{}}})()",
            doc, body
        );
        let remote = self.tab.evaluate(&script, false)?;
        let text = remote
            .value
            .as_ref()
            .and_then(Value::as_str)
            .ok_or_else(|| ScrapeError::Browser("unexpected script result".into()))?;
        let value: Value = serde_json::from_str(text)?;

        if value.get("detached").and_then(Value::as_bool) == Some(true) {
            return Err(ScrapeError::StaleElement("content frame is gone".into()));
        }
        Ok(value)
    }

    fn eval(&self, body: &str) -> Result<Value> {
        self.eval_in(&self.doc_expr(), body)
    }
}

impl Session for ChromeSession {
    fn navigate(&mut self, url: &str) -> Result<()> {
        self.frame = None;
        self.tab.navigate_to(url)?.wait_until_navigated()?;
        Ok(())
    }

    fn switch_to_default(&mut self) -> Result<()> {
        self.frame = None;
        Ok(())
    }

    fn switch_to_frame(&mut self, frame_selector: &str) -> Result<bool> {
        let body = format!(
            "var f=doc.querySelector({});if(!f){{return JSON.stringify({{ready:false}});}}\
             var d=null;try{{d=f.contentDocument;}}catch(e){{}}\
             return JSON.stringify({{ready:!!d&&d.readyState!=='loading'}});",
            js_str(frame_selector)
        );
        let value = self.eval_in("document", &body)?;
        let ready = value.get("ready").and_then(Value::as_bool).unwrap_or(false);
        if ready {
            self.frame = Some(frame_selector.to_string());
        }
        Ok(ready)
    }

    fn find_elements(&mut self, selector: &str) -> Result<Vec<ElementInfo>> {
        let body = format!(
            "var els=doc.querySelectorAll({});\
             return JSON.stringify(Array.prototype.map.call(els,function(e){{return (e.innerText||e.textContent||'').trim();}}));",
            js_str(selector)
        );
        let texts: Vec<String> = serde_json::from_value(self.eval(&body)?)?;
        Ok(texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| ElementInfo { index, text })
            .collect())
    }

    fn click(&mut self, selector: &str, nth: usize) -> Result<()> {
        let body = format!(
            "var el=doc.querySelectorAll({})[{}];if(!el){{return JSON.stringify({{missing:true}});}}\
             el.scrollIntoView({{block:'center'}});el.click();return JSON.stringify({{ok:true}});",
            js_str(selector),
            nth
        );
        let value = self.eval(&body)?;
        if value.get("missing").is_some() {
            return Err(ScrapeError::StaleElement(format!("{}[{}]", selector, nth)));
        }
        Ok(())
    }

    fn select_option(&mut self, select_selector: &str, index: usize) -> Result<()> {
        let body = format!(
            "var el=doc.querySelector({sel});if(!el){{return JSON.stringify({{missing:true}});}}\
             if({idx}>=el.options.length){{return JSON.stringify({{out_of_range:true}});}}\
             el.selectedIndex={idx};el.dispatchEvent(new Event('change',{{bubbles:true}}));\
             return JSON.stringify({{ok:true}});",
            sel = js_str(select_selector),
            idx = index
        );
        let value = self.eval(&body)?;
        if value.get("missing").is_some() {
            return Err(ScrapeError::StaleElement(select_selector.to_string()));
        }
        if value.get("out_of_range").is_some() {
            return Err(ScrapeError::ElementNotFound(format!("{} option #{}", select_selector, index)));
        }
        Ok(())
    }

    fn go_back(&mut self) -> Result<()> {
        self.frame = None;
        self.tab.evaluate("history.back()", false)?;
        self.tab.wait_until_navigated()?;
        Ok(())
    }

    fn page_source(&mut self) -> Result<String> {
        if self.frame.is_none() {
            return Ok(self.tab.get_content()?);
        }
        let value = self.eval("return JSON.stringify({html:doc.documentElement.outerHTML});")?;
        value
            .get("html")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ScrapeError::Browser("frame markup unavailable".into()))
    }
}
