//! Entry point for the college directory.

use eamcet_predictor::pages::DirectoryPage;

fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<DirectoryPage>::new().render();
}
