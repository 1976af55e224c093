use maud::{DOCTYPE, Markup, html};

use crate::cards::{DetailCard, LandingCard, ReviewCard, SearchCard};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

pub const SEARCH_ERROR: &str = "Oops. Something went wrong.";

pub fn index_page(cards: &[LandingCard], search: Option<&str>) -> String {
    page(
        "Film Reviews",
        html! {
            div class="max-w-5xl mx-auto px-6 py-10" {
                h1 class="text-3xl font-bold text-gray-900" {
                    @if let Some(search) = search {
                        "Reviews matching \"" (search) "\""
                    } @else {
                        "Your reviews"
                    }
                }

                @if cards.is_empty() {
                    a class="mt-10 block bg-white shadow rounded-lg p-8 hover:bg-gray-50" href="/search" {
                        p class="text-gray-600" { "No reviews yet. Search IMDb for something to review." }
                    }
                } @else {
                    div class="mt-10 grid gap-6 sm:grid-cols-2 lg:grid-cols-3" {
                        @for card in cards {
                            a class="block bg-white shadow rounded-lg overflow-hidden hover:shadow-lg" href=(card.href) {
                                (poster(card.image.as_deref(), &card.title))
                                div class="p-4" {
                                    h2 class="font-semibold text-gray-900" { (card.title) }
                                    p class="mt-1 text-sm text-gray-600" { (stars(card.rating)) }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn search_page(cards: &[SearchCard], error: Option<&str>) -> String {
    page(
        "Search IMDb",
        html! {
            div class="max-w-5xl mx-auto px-6 py-10" {
                h1 class="text-3xl font-bold text-gray-900" { "Search IMDb" }
                p class="mt-2 text-gray-600" { "A title search ignores the other filters." }

                form class="mt-6 grid gap-4 md:grid-cols-5 items-end" method="post" action="/search" {
                    (field("Title", "title", "text"))
                    (field("Genre", "genre", "text"))
                    (field("Year", "year", "number"))
                    div {
                        label class="block text-sm font-medium text-gray-700" for="rating" { "Min rating" }
                        select class="mt-2 w-full rounded-md border border-gray-300 px-3 py-2" name="rating" id="rating" {
                            @for r in 0..=5 {
                                option value=(r) { (r) }
                            }
                        }
                    }
                    button class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { "Search" }
                }

                @if let Some(error) = error {
                    div class="mt-6 rounded-md bg-red-50 p-4 text-red-700" { (error) }
                }

                div class="mt-10 grid gap-6 sm:grid-cols-2 lg:grid-cols-3" {
                    @for card in cards {
                        a class="block bg-white shadow rounded-lg overflow-hidden hover:shadow-lg" href=(card.href) {
                            (poster(card.image.as_deref(), &card.title))
                            div class="p-4" {
                                h2 class="font-semibold text-gray-900" { (card.title) }
                                p class="mt-1 text-sm text-gray-500" {
                                    @if let Some(genre) = &card.genre { (genre) }
                                    @if let Some(year) = card.year { " · " (year) }
                                }
                                @if let Some(rating) = card.rating {
                                    p class="mt-1 text-sm text-gray-600" { (rating) " / 5" }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn detail_page(card: &DetailCard) -> String {
    let action = format!("/review/{}", urlencoding::encode(&card.id));

    page(
        &card.title,
        html! {
            div class="max-w-4xl mx-auto px-6 py-10" {
                div class="bg-white shadow rounded-lg p-8 md:flex gap-8" {
                    div class="md:w-1/3" { (poster(card.image.as_deref(), &card.title)) }
                    div class="md:w-2/3" {
                        h1 class="text-3xl font-bold text-gray-900" {
                            (card.title)
                            @if let Some(year) = card.year {
                                span class="ml-2 font-normal text-gray-500" { "(" (year) ")" }
                            }
                        }
                        p class="mt-2 text-gray-600" {
                            (card.genres.join(", "))
                            @if let Some(minutes) = card.runtime_minutes { " · " (minutes) " min" }
                            @if let Some(rating) = card.rating { " · " (stars(rating)) }
                        }
                        @if let Some(plot) = &card.plot {
                            p class="mt-4 text-gray-700" { (plot) }
                        }
                        (people("Director", &card.directors))
                        (people("Stars", &card.stars))
                        (people("Language", &card.languages))
                    }
                }

                details class="mt-8 bg-white shadow rounded-lg p-8" {
                    summary class="cursor-pointer font-semibold text-gray-900" { "Write a review" }
                    form class="mt-6 space-y-4" method="post" action=(action) {
                        input type="hidden" name="movieTitle" value=(card.title);
                        input type="hidden" name="plot" value=(card.plot.as_deref().unwrap_or_default());
                        input type="hidden" name="image" value=(card.image.as_deref().unwrap_or_default());
                        (field("Review title", "title", "text"))
                        (field("Author", "author", "text"))
                        (rating_input(None))
                        div {
                            label class="block text-sm font-medium text-gray-700" for="content" { "Review" }
                            textarea class="mt-2 w-full rounded-md border border-gray-300 px-3 py-2" rows="6" name="content" id="content" {}
                        }
                        button class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { "Submit" }
                    }
                }
            }
        },
    )
}

pub fn review_page(card: &ReviewCard) -> String {
    page(
        &card.review_title,
        html! {
            div class="max-w-4xl mx-auto px-6 py-10" {
                div class="bg-white shadow rounded-lg p-8 md:flex gap-8" {
                    div class="md:w-1/3" { (poster(card.image.as_deref(), &card.cache_title)) }
                    div class="md:w-2/3" {
                        a class="text-sm text-blue-600 hover:text-blue-800" href=(card.detail_href) { (card.cache_title) }
                        h1 class="mt-1 text-3xl font-bold text-gray-900" { (card.review_title) }
                        p class="mt-2 text-gray-600" {
                            (stars(card.rating))
                            @if let Some(author) = &card.author { " · " (author) }
                            @if let Some(date) = &card.date { " · " (date) }
                        }
                        p class="mt-4 whitespace-pre-line text-gray-800" { (card.content) }
                        @if let Some(plot) = &card.plot {
                            p class="mt-6 text-sm text-gray-500" { (plot) }
                        }
                    }
                }

                details class="mt-8 bg-white shadow rounded-lg p-8" {
                    summary class="cursor-pointer font-semibold text-gray-900" { "Edit" }
                    form class="mt-6 space-y-4" method="post" action=(format!("/update/{}", card.id)) {
                        div {
                            label class="block text-sm font-medium text-gray-700" for="reviewTitle" { "Review title" }
                            input class="mt-2 w-full rounded-md border border-gray-300 px-3 py-2" name="reviewTitle" id="reviewTitle" value=(card.review_title);
                        }
                        div {
                            label class="block text-sm font-medium text-gray-700" for="reviewAuth" { "Author" }
                            input class="mt-2 w-full rounded-md border border-gray-300 px-3 py-2" name="reviewAuth" id="reviewAuth" value=(card.author.as_deref().unwrap_or_default());
                        }
                        (rating_input(Some(card.rating)))
                        div {
                            label class="block text-sm font-medium text-gray-700" for="content" { "Review" }
                            textarea class="mt-2 w-full rounded-md border border-gray-300 px-3 py-2" rows="6" name="content" id="content" { (card.content) }
                        }
                        button class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { "Save" }
                    }
                }

                details class="mt-4 bg-white shadow rounded-lg p-8" {
                    summary class="cursor-pointer font-semibold text-red-700" { "Delete" }
                    form class="mt-4" method="post" action=(format!("/delete/{}", card.id)) {
                        p class="text-gray-600" { "This cannot be undone." }
                        button class="mt-4 rounded-md bg-red-600 px-4 py-2 font-semibold text-white hover:bg-red-700" type="submit" { "Delete review" }
                    }
                }
            }
        },
    )
}

pub fn error_page(message: String) -> String {
    page(
        "Error",
        html! {
            div class="max-w-xl mx-auto px-6 py-12" {
                div class="bg-white shadow rounded-lg p-8" {
                    h1 class="text-2xl font-bold text-gray-900" { "Error" }
                    p class="mt-4 text-gray-700" { (message) }
                    a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
                }
            }
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body class="min-h-screen bg-gray-50" {
                (nav())
                (body)
            }
        }
    }
    .into_string()
}

fn nav() -> Markup {
    html! {
        nav class="bg-white shadow" {
            div class="max-w-5xl mx-auto px-6 py-4 flex items-center justify-between gap-6" {
                a class="text-lg font-bold text-gray-900" href="/" { "Film Reviews" }
                form class="flex-1 max-w-sm" method="get" action="/find" {
                    input class="w-full rounded-md border border-gray-300 px-3 py-1" type="search" name="searchString" placeholder="Find a review";
                }
                a class="text-sm text-blue-600 hover:text-blue-800" href="/search" { "Search IMDb" }
            }
        }
    }
}

fn field(label: &str, name: &str, kind: &str) -> Markup {
    html! {
        div {
            label class="block text-sm font-medium text-gray-700" for=(name) { (label) }
            input class="mt-2 w-full rounded-md border border-gray-300 px-3 py-2" type=(kind) name=(name) id=(name);
        }
    }
}

fn rating_input(current: Option<f64>) -> Markup {
    html! {
        div {
            label class="block text-sm font-medium text-gray-700" for="rating" { "Rating (0-5)" }
            input class="mt-2 w-24 rounded-md border border-gray-300 px-3 py-2" type="number" min="0" max="5" step="0.5" name="rating" id="rating" value=(current.map(|r| r.to_string()).unwrap_or_default());
        }
    }
}

fn people(label: &str, names: &[String]) -> Markup {
    html! {
        @if !names.is_empty() {
            p class="mt-3 text-sm text-gray-700" {
                span class="font-semibold" { (label) ": " }
                (names.join(", "))
            }
        }
    }
}

fn poster(image: Option<&str>, alt: &str) -> Markup {
    html! {
        @if let Some(src) = image {
            img class="w-full h-64 object-cover" src=(src) alt=(alt);
        } @else {
            div class="w-full h-64 bg-gray-200 flex items-center justify-center text-gray-400" { "No image" }
        }
    }
}

fn stars(rating: f64) -> String {
    format!("{rating:.1} / 5")
}
