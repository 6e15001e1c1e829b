use super::super::Model;
use super::utils::{format_timestamp, render_bar};
use shared::metrics::{format_percent, format_seconds, RADAR_AXES};
use shared::{Algorithm, DisplayBundle, PredictionResult};
use yew::prelude::*;

pub fn render_results(model: &Model) -> Html {
    match &model.bundle {
        Some(bundle) => render_bundle(bundle),
        None => html! {
            <p class="no-results-message">{"Results will appear here after the first classification."}</p>
        },
    }
}

fn render_bundle(bundle: &DisplayBundle) -> Html {
    let session = &bundle.session;

    html! {
        <div class="results-container">
            <div class="result-header">
                <h2>
                    {"Results "}
                    <span class={classes!("badge", bundle.agreement.badge_class())}>
                        { bundle.agreement.to_string() }
                    </span>
                </h2>
                if bundle.replayed {
                    <p class="replay-notice">
                        <i class="fa-solid fa-clock-rotate-left"></i>
                        { format!(" From history, {}", format_timestamp(session)) }
                    </p>
                }
                <p class="text-preview">{ &session.input_text_preview }</p>
            </div>

            <div class="algorithm-cards">
                { for session.results.iter().map(|(algorithm, result)| render_algorithm_card(bundle, algorithm, result)) }
            </div>

            { render_comparison_table(bundle) }
            { render_charts(bundle) }
            { render_performance(bundle) }
        </div>
    }
}

fn render_algorithm_card(bundle: &DisplayBundle, algorithm: Algorithm, result: &PredictionResult) -> Html {
    let confidence = result.confidence_percent();

    html! {
        <div class={classes!("algorithm-card", algorithm.short_name())}>
            <h3>{ algorithm.display_name() }</h3>
            <p class="predicted-category">{ &result.predicted_category }</p>
            <div class="confidence-meter">
                <div class="meter-label">{"Confidence:"}</div>
                <div class="meter">
                    <div class="meter-fill" style={format!("width: {:.2}%", confidence.clamp(0.0, 100.0))}></div>
                </div>
                <div class="meter-value">{ format_percent(result.confidence) }</div>
            </div>
            <div class="result-bars">
                { for bundle.top_probabilities.get(algorithm).iter().map(|score| {
                    render_bar(&score.category, score.percent(), format!("{:.2}%", score.percent()), "probability")
                })}
            </div>
            <p class="prediction-time">{ format!("{:.3} ms", result.prediction_time_ms) }</p>
        </div>
    }
}

fn render_comparison_table(bundle: &DisplayBundle) -> Html {
    html! {
        <table class="comparison-table">
            <thead>
                <tr>
                    <th>{"Algorithm"}</th>
                    <th>{"Predicted category"}</th>
                    <th>{"Confidence"}</th>
                    <th>{"Time"}</th>
                </tr>
            </thead>
            <tbody>
                { for bundle.session.results.iter().map(|(algorithm, result)| html! {
                    <tr>
                        <td>{ algorithm.display_name() }</td>
                        <td>{ &result.predicted_category }</td>
                        <td>{ format_percent(result.confidence) }</td>
                        <td>{ format!("{:.3} ms", bundle.timing_series.get(algorithm)) }</td>
                    </tr>
                })}
            </tbody>
        </table>
    }
}

fn render_charts(bundle: &DisplayBundle) -> Html {
    let slowest = bundle
        .timing_series
        .values()
        .into_iter()
        .copied()
        .fold(0.0_f64, f64::max);

    html! {
        <div class="charts">
            <div class="chart">
                <h3>{"Prediction time"}</h3>
                { for bundle.timing_series.iter().map(|(algorithm, &ms)| {
                    let percent = if slowest > 0.0 { ms / slowest * 100.0 } else { 0.0 };
                    render_bar(algorithm.display_name(), percent, format!("{:.3} ms", ms), algorithm.short_name())
                })}
            </div>

            <div class="chart">
                <h3>{"Confidence"}</h3>
                { for bundle.confidence_series.iter().map(|(algorithm, &percent)| {
                    render_bar(algorithm.display_name(), percent, format!("{:.2}%", percent), algorithm.short_name())
                })}
            </div>

            if !bundle.probability_ceiling.is_empty() {
                <div class="chart">
                    <h3>{"Highest probability per category"}</h3>
                    { for bundle.probability_ceiling.iter().map(|score| {
                        render_bar(&score.category, score.percent(), format!("{:.2}%", score.percent()), "probability")
                    })}
                </div>
            }

            <div class="chart radar">
                <h3>{"Overall comparison"}</h3>
                { for bundle.radar.iter().map(|(algorithm, point)| html! {
                    <div class="radar-group">
                        <h4>{ algorithm.display_name() }</h4>
                        { for RADAR_AXES.iter().zip(point.axes()).map(|(axis, value)| {
                            render_bar(axis, value, format!("{:.1}", value), algorithm.short_name())
                        })}
                    </div>
                })}
            </div>
        </div>
    }
}

fn render_performance(bundle: &DisplayBundle) -> Html {
    let session = &bundle.session;
    let performance = &session.performance;

    html! {
        <div class="performance">
            <h3>{"Performance"}</h3>
            <ul>
                <li>{ format!("Preprocessing: {}", format_seconds(performance.preprocessing_time_sec)) }</li>
                <li>{ format!("Vectorization: {}", format_seconds(performance.vectorization_time_sec)) }</li>
                <li>{ format!("Total: {}", format_seconds(performance.total_time_sec)) }</li>
                if session.input_text_length > 0 {
                    <li>{ format!("Text length: {} characters, {} words", session.input_text_length, session.processed_text_length) }</li>
                }
            </ul>
        </div>
    }
}
