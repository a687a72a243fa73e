//! Entry point for the analytics dashboard.

use eamcet_predictor::pages::AnalyticsPage;

fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<AnalyticsPage>::new().render();
}
