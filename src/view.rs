use crate::app::{Message, WeatherApp};
use crate::components::{self, TEXT_DIM, TEXT_LIGHT};
use iced::{
    theme,
    widget::{button, column, container, row, text, text_input, Row, Space},
    Alignment, Element, Length,
};

pub fn view(app: &WeatherApp) -> Element<Message> {
    // A dialog takes over the window until dismissed
    if let Some(dialog) = &app.dialog {
        return container(components::create_dialog(dialog))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x()
            .center_y()
            .into();
    }

    let conditions = column![
        components::create_location_row(app),
        components::create_current_panel(app),
        components::create_detail_tiles(app),
        components::create_aqi_label(app),
    ]
    .spacing(10)
    .padding([0, 40]);

    let footer = container(text("Powered by OpenWeatherMap").size(12).style(TEXT_DIM))
        .width(Length::Fill)
        .padding(8)
        .center_x()
        .style(theme::Container::Box);

    column![
        create_search_card(app),
        conditions,
        create_forecast_section(app),
        Space::with_height(Length::Fill),
        footer,
    ]
    .spacing(10)
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}

fn create_search_card(app: &WeatherApp) -> Element<Message> {
    let city_input = text_input("City name", &app.city_input)
        .on_input(Message::CityInputChanged)
        .on_submit(Message::Search)
        .padding(10)
        .size(16)
        .width(Length::Fixed(300.0));

    let search_button = button(text("Search").size(14))
        .on_press(Message::Search)
        .padding([10, 16])
        .style(theme::Button::Primary);

    let mut search_row = row![
        text("Enter a city:").size(16).style(TEXT_DIM),
        city_input,
        search_button,
    ]
    .spacing(15)
    .align_items(Alignment::Center);

    if app.loading {
        search_row = search_row.push(text("Loading weather data...").size(14).style(TEXT_DIM));
    }

    container(search_row)
        .padding(12)
        .width(Length::Fill)
        .center_x()
        .style(theme::Container::Box)
        .into()
}

fn create_forecast_section(app: &WeatherApp) -> Element<Message> {
    let cards = app
        .cards
        .iter()
        .fold(Row::new().spacing(30), |cards, card| {
            cards.push(components::create_forecast_card(card))
        });

    column![
        text("5-Day Forecast").size(22).style(TEXT_LIGHT),
        cards.width(Length::Fill),
    ]
    .spacing(8)
    .padding([0, 30])
    .align_items(Alignment::Center)
    .into()
}
