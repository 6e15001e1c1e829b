use crate::api;
use gloo_console::error;
use shared::metrics::format_percent;
use shared::{Algorithm, TrainingInfo};
use strum::IntoEnumIterator;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Clone, PartialEq)]
enum LoadState {
    Loading,
    Loaded(TrainingInfo),
    Failed(String),
}

/// Fetches the training summary once, when first mounted.
#[function_component(TrainingInfoPanel)]
pub fn training_info_panel() -> Html {
    let state = use_state(|| LoadState::Loading);

    {
        let state = state.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match api::training_info().await {
                    Ok(info) => state.set(LoadState::Loaded(info)),
                    Err(e) => {
                        error!(format!("Training info fetch failed: {}", e));
                        state.set(LoadState::Failed(e.user_message()));
                    }
                }
            });
            || ()
        });
    }

    html! {
        <div class="training-info">
            {
                match &*state {
                    LoadState::Loading => html! { <p>{"Loading training details..."}</p> },
                    LoadState::Failed(message) => html! { <p class="error-message">{ message }</p> },
                    LoadState::Loaded(info) => render_info(info),
                }
            }
        </div>
    }
}

fn render_info(info: &TrainingInfo) -> Html {
    let dataset = &info.dataset;
    let preprocessing = &info.preprocessing;
    let categories = if dataset.categories_formatted.is_empty() {
        &dataset.categories
    } else {
        &dataset.categories_formatted
    };

    html! {
        <>
            <h3>{ format!("Dataset: {}", dataset.name) }</h3>
            <p>
                { format!(
                    "{} documents ({} train / {} test), {} categories, {} features",
                    dataset.total_documents,
                    dataset.train_documents,
                    dataset.test_documents,
                    dataset.num_categories,
                    dataset.features
                ) }
            </p>
            if !categories.is_empty() {
                <p class="categories">{ categories.join(", ") }</p>
            }
            <p>
                { format!(
                    "{} vectorizer, max {} features, n-grams {}, stemming {}, stopwords {}",
                    preprocessing.vectorizer_type,
                    preprocessing.max_features,
                    preprocessing.ngram_range,
                    if preprocessing.use_stemming { "on" } else { "off" },
                    if preprocessing.use_stopwords { "on" } else { "off" }
                ) }
            </p>

            <table class="comparison-table">
                <thead>
                    <tr>
                        <th>{"Algorithm"}</th>
                        <th>{"Accuracy"}</th>
                        <th>{"Training time"}</th>
                        <th>{"Parameters"}</th>
                    </tr>
                </thead>
                <tbody>
                    { for Algorithm::iter().map(|algorithm| {
                        let trained = info.algorithms.get(algorithm);
                        html! {
                            <tr>
                                <td>{ algorithm.display_name() }</td>
                                <td>{ format_percent(trained.accuracy) }</td>
                                <td>{ &trained.training_time_formatted }</td>
                                <td>{ trained.parameter_summary() }</td>
                            </tr>
                        }
                    })}
                </tbody>
            </table>

            <ul class="training-summary">
                if let Some((_, best)) = info.best_accuracy() {
                    <li>{ format!("Best accuracy: {} ({})", best.name, format_percent(best.accuracy)) }</li>
                }
                if let Some((_, fastest)) = info.fastest_training() {
                    <li>{ format!("Fastest training: {} ({})", fastest.name, fastest.training_time_formatted) }</li>
                }
                if let Some(date) = &info.training_date {
                    <li>{ format!("Trained on {}", date) }</li>
                }
            </ul>
        </>
    }
}
