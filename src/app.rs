use crate::animation::{CardAnimation, StepToken, STEP_INTERVAL};
use crate::error::WeatherError;
use crate::forecast::{self, ForecastDay};
use crate::icons::{Icon, IconCache};
use crate::view;
use crate::weather::{
    self, AirQualityResponse, AqiLevel, CurrentConditions, ForecastResponse, SearchOutcome,
    WeatherClient, WeatherPayloads,
};
use chrono::{DateTime, Utc};
use iced::{Application, Command, Element, Theme};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const CURRENT_ICON_SIZE: u32 = 150;
pub const CARD_ICON_SIZE: u32 = 45;
pub const NOT_FOUND_MESSAGE: &str = "City not found!";
pub const DEFAULT_STATUS: &str = "Weather Status";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardId(u64);

/// Where a loaded icon goes. The current panel's slot carries the display
/// generation it was requested for; card ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSlot {
    Current(u64),
    Card(CardId),
}

#[derive(Debug, Clone)]
pub enum Message {
    CityInputChanged(String),
    Search,
    WeatherFetched {
        search: u64,
        city: String,
        result: Result<SearchOutcome, WeatherError>,
    },
    IconLoaded {
        slot: IconSlot,
        icon: Option<Arc<Icon>>,
    },
    CardEntered(CardId),
    CardLeft(CardId),
    CardStep {
        card: CardId,
        token: StepToken,
    },
    DismissDialog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub message: String,
}

impl Dialog {
    fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: DialogKind::Warning,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: DialogKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub struct ForecastCard {
    pub id: CardId,
    pub day: ForecastDay,
    pub icon: Option<Arc<Icon>>,
    pub animation: CardAnimation,
}

pub struct WeatherApp {
    client: WeatherClient,
    icons: IconCache,
    /// Bumped on every search; results tagged with an older value are dropped.
    search: u64,
    /// Bumped whenever the current panel is rewritten or cleared.
    current_generation: u64,
    next_card_id: u64,
    pub city_input: String,
    pub loading: bool,
    pub location: String,
    pub local_time: String,
    pub status: String,
    pub current: Option<CurrentConditions>,
    pub current_icon: Option<Arc<Icon>>,
    pub air_quality: Option<AqiLevel>,
    pub cards: Vec<ForecastCard>,
    pub dialog: Option<Dialog>,
}

impl WeatherApp {
    pub fn with_services(client: WeatherClient, icons: IconCache) -> Self {
        Self {
            client,
            icons,
            search: 0,
            current_generation: 0,
            next_card_id: 0,
            city_input: String::new(),
            loading: false,
            location: String::new(),
            local_time: String::new(),
            status: DEFAULT_STATUS.to_string(),
            current: None,
            current_icon: None,
            air_quality: None,
            cards: Vec::new(),
            dialog: None,
        }
    }

    fn start_search(&mut self) -> Command<Message> {
        let city = self.city_input.trim().to_string();
        if city.is_empty() {
            self.dialog = Some(Dialog::warning("Please enter a city name"));
            return Command::none();
        }

        self.search += 1;
        self.loading = true;
        let search = self.search;
        info!(%city, search, "Starting search");

        let client = self.client.clone();
        Command::perform(
            async move {
                let result = client.fetch(&city).await;
                (city, result)
            },
            move |(city, result)| Message::WeatherFetched {
                search,
                city,
                result,
            },
        )
    }

    fn finish_search(
        &mut self,
        city: String,
        result: Result<SearchOutcome, WeatherError>,
    ) -> Command<Message> {
        self.loading = false;
        match result {
            Ok(SearchOutcome::Found(payloads)) => self.apply(&city, *payloads, Utc::now()),
            Ok(SearchOutcome::NotFound { code, message }) => {
                warn!(%city, code, %message, "City not found");
                self.show_not_found();
                Command::none()
            }
            Err(err) => {
                error!(%city, error = %err, "Weather request failed");
                self.dialog = Some(Dialog::error(err.dialog_message()));
                Command::none()
            }
        }
    }

    fn apply(&mut self, city: &str, payloads: WeatherPayloads, now: DateTime<Utc>) -> Command<Message> {
        let conditions = payloads.current.conditions();
        let mut commands = Vec::new();

        self.location = weather::title_case(city);
        self.local_time = conditions.local_time_label(now);
        self.status = conditions.description_label();

        self.current_generation += 1;
        self.current_icon = None;
        if let Some(code) = &conditions.icon {
            let slot = IconSlot::Current(self.current_generation);
            commands.push(self.load_icon(code, CURRENT_ICON_SIZE, slot));
        }

        match payloads.air_quality.as_ref().and_then(AirQualityResponse::level) {
            Some(level) => self.air_quality = Some(level),
            None => debug!("No air quality reading; keeping previous label"),
        }

        match payloads.forecast.filter(ForecastResponse::is_available) {
            Some(forecast) => {
                let days = forecast::daily_forecast(&forecast.list, conditions.local_time(now));
                debug!(days = days.len(), "Rebuilding forecast cards");
                commands.extend(self.replace_cards(days));
            }
            None => warn!("Forecast unavailable; keeping previous cards"),
        }

        self.current = Some(conditions);
        Command::batch(commands)
    }

    fn show_not_found(&mut self) {
        self.status = NOT_FOUND_MESSAGE.to_string();
        self.location.clear();
        self.local_time.clear();
        self.current = None;
        self.current_generation += 1;
        self.current_icon = None;
        self.air_quality = None;
        self.discard_cards();
    }

    fn replace_cards(&mut self, days: Vec<ForecastDay>) -> Vec<Command<Message>> {
        self.discard_cards();

        let mut commands = Vec::with_capacity(days.len());
        for day in days {
            let id = CardId(self.next_card_id);
            self.next_card_id += 1;

            if let Some(code) = &day.icon {
                commands.push(self.load_icon(code, CARD_ICON_SIZE, IconSlot::Card(id)));
            }
            self.cards.push(ForecastCard {
                id,
                day,
                icon: None,
                animation: CardAnimation::new(),
            });
        }
        commands
    }

    /// Cancels every card's animation before dropping the cards, so steps
    /// still in flight find nothing to move.
    fn discard_cards(&mut self) {
        for card in &mut self.cards {
            card.animation.cancel();
        }
        self.cards.clear();
    }

    fn card_mut(&mut self, id: CardId) -> Option<&mut ForecastCard> {
        self.cards.iter_mut().find(|card| card.id == id)
    }

    fn load_icon(&self, code: &str, size: u32, slot: IconSlot) -> Command<Message> {
        let icons = self.icons.clone();
        let code = code.to_string();
        Command::perform(
            async move { icons.get(&code, size).await },
            move |icon| Message::IconLoaded { slot, icon },
        )
    }

    fn schedule_step(card: CardId, token: StepToken) -> Command<Message> {
        Command::perform(
            async move { tokio::time::sleep(STEP_INTERVAL).await },
            move |()| Message::CardStep { card, token },
        )
    }
}

impl Application for WeatherApp {
    type Message = Message;
    type Theme = Theme;
    type Executor = iced::executor::Default;
    type Flags = (WeatherClient, IconCache);

    fn new((client, icons): Self::Flags) -> (WeatherApp, Command<Message>) {
        (WeatherApp::with_services(client, icons), Command::none())
    }

    fn title(&self) -> String {
        String::from("Weather Forecast")
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::CityInputChanged(value) => {
                self.city_input = value;
                Command::none()
            }
            Message::Search => self.start_search(),
            Message::WeatherFetched {
                search,
                city,
                result,
            } => {
                if search != self.search {
                    debug!(search, latest = self.search, "Discarding stale weather result");
                    return Command::none();
                }
                self.finish_search(city, result)
            }
            Message::IconLoaded { slot, icon } => {
                match slot {
                    IconSlot::Current(generation) if generation == self.current_generation => {
                        self.current_icon = icon;
                    }
                    IconSlot::Current(generation) => {
                        debug!(
                            generation,
                            latest = self.current_generation,
                            "Discarding stale icon"
                        );
                    }
                    IconSlot::Card(id) => match self.card_mut(id) {
                        Some(card) => card.icon = icon,
                        None => debug!(?id, "Icon for a discarded card"),
                    },
                }
                Command::none()
            }
            Message::CardEntered(id) => {
                let token = self
                    .card_mut(id)
                    .and_then(|card| card.animation.pointer_entered());
                match token {
                    Some(token) => Self::schedule_step(id, token),
                    None => Command::none(),
                }
            }
            Message::CardLeft(id) => {
                if let Some(card) = self.card_mut(id) {
                    card.animation.pointer_left();
                }
                Command::none()
            }
            Message::CardStep { card, token } => {
                let next = self
                    .card_mut(card)
                    .and_then(|c| c.animation.advance(token));
                match next {
                    Some(token) => Self::schedule_step(card, token),
                    None => Command::none(),
                }
            }
            Message::DismissDialog => {
                self.dialog = None;
                Command::none()
            }
        }
    }

    fn theme(&self) -> Theme {
        Theme::Nord
    }

    fn view(&self) -> Element<Message> {
        view::view(self)
    }
}
