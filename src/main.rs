//! Entry point for the rank-based predictor page.

use eamcet_predictor::pages::PredictorPage;

fn main() {
    // Set the panic hook to log detailed errors to the console
    console_error_panic_hook::set_once();
    yew::Renderer::<PredictorPage>::new().render();
}
