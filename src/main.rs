mod ads;
mod api;
mod config;
mod converter;
mod counter;
mod notice;
mod routes;

fn main() {
    dioxus::launch(routes::App);
}
