use super::super::Model;
use chrono::Local;
use gloo_timers::callback::Timeout;
use shared::ClassificationSession;
use std::cell::RefCell;
use std::rc::Rc;
use yew::prelude::*;

// Debounce function to limit button events
pub fn debounce<F>(duration: u32, callback: F) -> Callback<MouseEvent>
where
    F: Fn() + Clone + 'static,
{
    let timeout = Rc::new(RefCell::new(None::<Timeout>));

    Callback::from(move |_| {
        let mut timeout_ref = timeout.borrow_mut();

        if let Some(old_timeout) = timeout_ref.take() {
            old_timeout.cancel();
        }

        let inner_callback = callback.clone();
        *timeout_ref = Some(Timeout::new(duration, move || inner_callback()));
    })
}

pub fn render_error_message(model: &Model) -> Html {
    if let Some(error_msg) = &model.error {
        html! {
            <div class="error-message">
                <i class="fa-solid fa-circle-exclamation"></i>
                <p>{ error_msg }</p>
            </div>
        }
    } else {
        html! {}
    }
}

/// Horizontal bar filled to `percent`, with a label and value column.
pub fn render_bar(label: &str, percent: f64, value: String, class: &'static str) -> Html {
    let width = percent.clamp(0.0, 100.0);
    html! {
        <div class="result-item">
            <div class="result-label" title={label.to_string()}>{ label }</div>
            <div class="result-bar-container">
                <div class={classes!("result-bar", class)} style={format!("width: {:.2}%", width)}></div>
            </div>
            <div class="result-value">{ value }</div>
        </div>
    }
}

pub fn format_timestamp(session: &ClassificationSession) -> String {
    session
        .created_at
        .with_timezone(&Local)
        .format("%d.%m.%Y %H:%M:%S")
        .to_string()
}
