use crate::animation::RISE_HEIGHT;
use crate::app::{
    Dialog, DialogKind, ForecastCard, Message, WeatherApp, CARD_ICON_SIZE, CURRENT_ICON_SIZE,
};
use iced::{
    alignment, theme,
    widget::{button, column, container, image, mouse_area, row, text, Space},
    Alignment, Color, Element, Length, Padding,
};

// Nord palette
pub const TEXT_LIGHT: Color = Color {
    r: 0.925,
    g: 0.937,
    b: 0.957,
    a: 1.0,
};
pub const TEXT_DIM: Color = Color {
    r: 0.847,
    g: 0.871,
    b: 0.914,
    a: 1.0,
};
pub const ACCENT: Color = Color {
    r: 0.533,
    g: 0.753,
    b: 0.816,
    a: 1.0,
};

pub fn create_location_row(app: &WeatherApp) -> Element<Message> {
    row![
        text(&app.location).size(28).style(TEXT_LIGHT),
        Space::with_width(Length::Fill),
        text(&app.local_time).size(14).style(TEXT_DIM),
    ]
    .align_items(Alignment::Center)
    .width(Length::Fill)
    .into()
}

pub fn create_current_panel(app: &WeatherApp) -> Element<Message> {
    let mut panel = column![].spacing(6).align_items(Alignment::Center);

    let icon_size = Length::Fixed(CURRENT_ICON_SIZE as f32);
    if let Some(icon) = &app.current_icon {
        panel = panel.push(image(icon.handle()).width(icon_size).height(icon_size));
    } else {
        panel = panel.push(Space::with_height(icon_size));
    }

    let temperature = match &app.current {
        Some(current) => current.temperature_label(),
        None => "--°C".to_string(),
    };

    panel = panel
        .push(text(temperature).size(68).style(ACCENT))
        .push(text(&app.status).size(18).style(TEXT_DIM));

    container(panel).width(Length::Fill).center_x().into()
}

pub fn create_detail_tiles(app: &WeatherApp) -> Element<Message> {
    let (humidity, wind, pressure) = match &app.current {
        Some(current) => (
            current.humidity_label(),
            current.wind_label(),
            current.pressure_label(),
        ),
        None => (
            "Humidity: --".to_string(),
            "Wind: -- m/s".to_string(),
            "Pressure: -- hPa".to_string(),
        ),
    };

    row![
        create_detail_tile(humidity),
        create_detail_tile(wind),
        create_detail_tile(pressure),
    ]
    .spacing(8)
    .width(Length::Fill)
    .into()
}

fn create_detail_tile<'a>(label: String) -> Element<'a, Message> {
    container(text(label).size(14).style(TEXT_DIM))
        .padding([8, 15])
        .width(Length::Fill)
        .center_x()
        .style(theme::Container::Box)
        .into()
}

pub fn create_aqi_label(app: &WeatherApp) -> Element<Message> {
    let label = match app.air_quality {
        Some(level) => {
            let (r, g, b) = level.rgb();
            text(format!("Air Quality: {}", level.label()))
                .size(16)
                .style(Color::from_rgb8(r, g, b))
        }
        None => text("Air Quality: --").size(16).style(TEXT_LIGHT),
    };

    container(label)
        .padding([8, 15])
        .width(Length::Fill)
        .center_x()
        .into()
}

/// A forecast card that lifts while hovered. The outer padding trades top
/// for bottom space so the row keeps its height while the card moves.
pub fn create_forecast_card(card: &ForecastCard) -> Element<Message> {
    let mut content = column![text(&card.day.label).size(16).style(TEXT_LIGHT)]
        .spacing(4)
        .align_items(Alignment::Center);

    if let Some(icon) = &card.icon {
        let size = Length::Fixed(CARD_ICON_SIZE as f32);
        content = content.push(image(icon.handle()).width(size).height(size));
    }

    content = content
        .push(text(card.day.temperature_label()).size(18).style(ACCENT))
        .push(
            text(&card.day.description)
                .size(12)
                .style(TEXT_DIM)
                .width(Length::Fixed(110.0))
                .horizontal_alignment(alignment::Horizontal::Center),
        );

    let offset = card.animation.offset();
    let lifted = container(
        container(content)
            .padding([8, 12])
            .width(Length::Fill)
            .center_x()
            .style(theme::Container::Box),
    )
    .padding(Padding {
        top: RISE_HEIGHT + offset,
        right: 0.0,
        bottom: -offset,
        left: 0.0,
    })
    .width(Length::Fill);

    mouse_area(lifted)
        .on_enter(Message::CardEntered(card.id))
        .on_exit(Message::CardLeft(card.id))
        .into()
}

pub fn create_dialog(dialog: &Dialog) -> Element<Message> {
    let (title, color) = match dialog.kind {
        DialogKind::Warning => ("Warning", Color::from_rgb8(0xEB, 0xCB, 0x8B)),
        DialogKind::Error => ("Error", Color::from_rgb8(0xBF, 0x61, 0x6A)),
    };

    let ok_button = button(
        text("OK")
            .size(14)
            .horizontal_alignment(alignment::Horizontal::Center),
    )
    .on_press(Message::DismissDialog)
    .padding([8, 24])
    .style(theme::Button::Primary);

    container(
        column![
            text(title).size(20).style(color),
            text(&dialog.message).size(14).style(TEXT_LIGHT),
            ok_button,
        ]
        .spacing(16)
        .align_items(Alignment::Center),
    )
    .padding(24)
    .width(Length::Fixed(420.0))
    .center_x()
    .style(theme::Container::Box)
    .into()
}
