//! Entry point for the branch comparison dashboard.

use eamcet_predictor::pages::BranchComparePage;

fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<BranchComparePage>::new().render();
}
