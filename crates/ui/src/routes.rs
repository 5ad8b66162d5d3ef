use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable};

use crate::views::ApplyView;

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", ApplyView)] Apply {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            header { class: "masthead",
                h1 { "University Admissions" }
                p { class: "masthead-sub", "Application for Admission" }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
