//! Entry point for the reverse rank calculator.

use eamcet_predictor::pages::CalculatorPage;

fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<CalculatorPage>::new().render();
}
