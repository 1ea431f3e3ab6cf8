use wasm_bindgen::prelude::*;

use crate::config::SessionConfig;
use crate::session::{Event, Expect, Session};
use crate::types::Outbound;

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Browser-side session. Messages are plain JS objects in the wire shape.
#[wasm_bindgen]
pub struct WasmSession {
    session: Session,
}

#[wasm_bindgen]
impl WasmSession {
    /// `config` may be `undefined` for the default search settings.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmSession, JsValue> {
        let config: SessionConfig = if config.is_undefined() || config.is_null() {
            SessionConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        config.search.validate().map_err(to_js_error)?;
        Ok(Self {
            session: Session::new(config),
        })
    }

    /// Messages a freshly connected peer receives.
    pub fn open(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&vec![self.session.open()])?)
    }

    /// Feeds one peer message and returns every reply, AI plies included.
    pub fn send(&mut self, message: JsValue) -> Result<JsValue, JsValue> {
        let event = match self.session.expects() {
            Expect::Config => Event::Configure(serde_wasm_bindgen::from_value(message)?),
            Expect::Move => Event::PlayerMove(serde_wasm_bindgen::from_value(message)?),
            Expect::Reset => Event::Reset(serde_wasm_bindgen::from_value(message)?),
            Expect::Nothing => return Err(JsValue::from_str("no input expected")),
        };

        let mut out: Vec<Outbound> = self.session.handle(event).map_err(to_js_error)?;
        out.extend(self.session.advance().map_err(to_js_error)?);
        Ok(serde_wasm_bindgen::to_value(&out)?)
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.session.snapshot())?)
    }
}
