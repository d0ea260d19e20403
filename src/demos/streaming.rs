//! Promise streaming demo: a dashboard assembled from slow fetchers
//!
//! All fetchers start together, so the loader takes as long as the slowest
//! one rather than the sum.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use super::{timestamp, Demos, Latency};
use crate::error::DemoError;

const CONDITIONS: [&str; 4] = ["Sunny", "Cloudy", "Rainy", "Windy"];

#[derive(Debug, Serialize)]
pub struct Weather {
    pub temp: u32,
    pub condition: &'static str,
    pub location: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Stock {
    pub symbol: &'static str,
    pub price: f64,
    pub change: f64,
}

#[derive(Debug, Serialize)]
pub struct Profile {
    pub name: &'static str,
    pub avatar: &'static str,
    pub role: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Notification {
    pub id: u32,
    pub title: &'static str,
    pub unread: bool,
}

#[derive(Debug, Serialize)]
pub struct Analytics {
    pub views: u32,
    pub clicks: u32,
    pub conversions: u32,
}

pub async fn fetch_weather(latency: Latency) -> Weather {
    latency.pause(1000).await;
    let mut rng = rand::thread_rng();
    Weather {
        temp: rng.gen_range(10..40),
        condition: CONDITIONS.choose(&mut rng).copied().unwrap_or("Sunny"),
        location: "San Francisco",
    }
}

pub async fn fetch_stock(latency: Latency) -> Stock {
    latency.pause(1500).await;
    let mut rng = rand::thread_rng();
    Stock {
        symbol: "ACME",
        price: rng.gen_range(150.0..200.0),
        change: rng.gen_range(-5.0..5.0),
    }
}

pub async fn fetch_profile(latency: Latency) -> Profile {
    latency.pause(800).await;
    Profile {
        name: "Jane Developer",
        avatar: "https://api.dicebear.com/7.x/avataaars/svg?seed=Jane",
        role: "Senior Engineer",
    }
}

pub async fn fetch_notifications(latency: Latency) -> Vec<Notification> {
    latency.pause(2000).await;
    vec![
        Notification {
            id: 1,
            title: "New comment on your PR",
            unread: true,
        },
        Notification {
            id: 2,
            title: "Build succeeded",
            unread: true,
        },
        Notification {
            id: 3,
            title: "Team meeting in 30 min",
            unread: false,
        },
    ]
}

pub async fn fetch_analytics(latency: Latency) -> Analytics {
    latency.pause(2500).await;
    let mut rng = rand::thread_rng();
    Analytics {
        views: rng.gen_range(5000..15000),
        clicks: rng.gen_range(500..1500),
        conversions: rng.gen_range(50..150),
    }
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub server_time: String,
    pub weather: Weather,
    pub stock: Stock,
    pub profile: Profile,
    pub notifications: Vec<Notification>,
    pub analytics: Analytics,
}

pub async fn loader(demos: &Demos) -> Result<Dashboard, DemoError> {
    let server_time = timestamp();
    let latency = demos.latency;
    let (weather, stock, profile, notifications, analytics) = tokio::join!(
        fetch_weather(latency),
        fetch_stock(latency),
        fetch_profile(latency),
        fetch_notifications(latency),
        fetch_analytics(latency),
    );
    Ok(Dashboard {
        server_time,
        weather,
        stock,
        profile,
        notifications,
        analytics,
    })
}
