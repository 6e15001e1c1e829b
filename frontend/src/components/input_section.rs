use super::super::{InputTab, Model, Msg};
use super::utils::debounce;
use gloo_file::File as GlooFile;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

pub fn render_input_section(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let tab_class = |tab: InputTab| classes!("tab-btn", (model.tab == tab).then_some("active"));

    let submit = {
        let link = link.clone();
        debounce(300, move || link.send_message(Msg::Submit))
    };

    html! {
        <div class="upload-section">
            <div class="tabs">
                <button class={tab_class(InputTab::Text)} onclick={link.callback(|_| Msg::SwitchTab(InputTab::Text))}>
                    <i class="fa-solid fa-keyboard"></i> {" Text"}
                </button>
                <button class={tab_class(InputTab::File)} onclick={link.callback(|_| Msg::SwitchTab(InputTab::File))}>
                    <i class="fa-solid fa-file-lines"></i> {" File"}
                </button>
            </div>

            {
                match model.tab {
                    InputTab::Text => render_text_input(model, ctx),
                    InputTab::File => render_file_input(model, ctx),
                }
            }

            <button id="classify-button" class="analyze-btn" disabled={model.loading} onclick={submit}>
                {
                    if model.loading {
                        html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Classifying..."}</> }
                    } else {
                        html! { <><i class="fa-solid fa-play"></i>{" Classify"}</> }
                    }
                }
            </button>
        </div>
    }
}

fn render_text_input(model: &Model, ctx: &Context<Model>) -> Html {
    let handle_input = ctx.link().callback(|e: InputEvent| {
        let area: HtmlTextAreaElement = e.target_unchecked_into();
        Msg::SetText(area.value())
    });

    html! {
        <textarea
            id="text-input"
            class="text-input"
            rows="10"
            placeholder="Paste or type the text to classify..."
            value={model.text.clone()}
            oninput={handle_input}
        />
    }
}

fn render_file_input(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();

    let handle_change = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let file = input
            .files()
            .and_then(|files| files.item(0))
            .map(GlooFile::from);
        input.set_value("");
        Msg::FileSelected(file)
    });

    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });

    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(false)
    });

    let handle_drop = link.callback(Msg::HandleDrop);

    let trigger_file_input = {
        let link = link.clone();
        move || {
            let input = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id("file-input"))
                .and_then(|element| element.dyn_into::<web_sys::HtmlElement>().ok());
            match input {
                Some(input) => input.click(),
                None => link.send_message(Msg::SetError(Some("File picker is unavailable.".into()))),
            }
        }
    };

    html! {
        <>
            <input
                type="file"
                id="file-input"
                accept=".txt,.csv,.json,.pdf"
                style="display: none;"
                onchange={handle_change}
            />

            <div
                id="drop-zone"
                class={classes!("upload-area", model.is_dragging.then_some("drag-over"))}
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={handle_drop}
                onclick={debounce(300, trigger_file_input)}
            >
                <div class="upload-placeholder">
                    <i class="fa-solid fa-cloud-arrow-up"></i>
                    {
                        match &model.file {
                            Some(file) => html! {
                                <p class="selected-file">{ format!("{} ({} bytes)", file.name(), file.size()) }</p>
                            },
                            None => html! { <p>{"Drag & drop a document here, or click to browse"}</p> },
                        }
                    }
                    <p class="file-types">{"Supported formats: TXT, CSV, JSON, PDF"}</p>
                </div>
            </div>
        </>
    }
}
