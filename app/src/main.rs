//! StudyDesk demo binary
//!
//! Signs in with the credentials from `STUDYDESK_EMAIL` and
//! `STUDYDESK_PASSWORD`, loads the dashboard that matches the account's
//! role, prints it, and signs out.

use anyhow::{Context, Result, bail};
use std::env;
use studydesk_api::{ClassQuery, Credentials, SubscriptionQuery, User};
use studydesk_app::auth::AuthAction;
use studydesk_app::entity::ClassesAction;
use studydesk_app::subscription::SubscriptionAction;
use studydesk_app::{AppAction, AppConfig, AppEnvironment, AppStore, app_store};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env().context("loading configuration")?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(api_url = %config.api_url, "Starting StudyDesk client");

    let email = env::var("STUDYDESK_EMAIL").context("STUDYDESK_EMAIL is not set")?;
    let password = env::var("STUDYDESK_PASSWORD").context("STUDYDESK_PASSWORD is not set")?;

    let store = app_store(AppEnvironment::http(config.api_url.clone()), config.store_config());

    println!("=== StudyDesk ===\n");

    dispatch(&store, AppAction::Auth(AuthAction::Login(Credentials::new(email, password)))).await?;

    let (user, authenticated, error) = store
        .state(|s| {
            (
                s.auth.current_user().cloned(),
                s.auth.is_authenticated,
                s.auth.error().map(str::to_string),
            )
        })
        .await;
    let Some(user) = user.filter(|_| authenticated) else {
        bail!("sign-in failed: {}", error.unwrap_or_default());
    };

    println!("Signed in as {} ({})", user.profile().display_name(), user.role());
    println!("Dashboard: {}\n", user.dashboard());

    match &user {
        User::Admin(_) => admin_dashboard(&store).await?,
        User::Teacher { student_count, .. } => {
            println!("Students: {student_count}");
            class_listing(&store).await?;
        },
        User::Student(_) => class_listing(&store).await?,
    }

    dispatch(&store, AppAction::Auth(AuthAction::Logout)).await?;
    println!("\nSigned out");

    store
        .shutdown(config.shutdown_timeout)
        .await
        .context("shutting down store")?;

    Ok(())
}

/// Send one action and wait for everything it started
async fn dispatch(store: &AppStore, action: AppAction) -> Result<()> {
    let mut handle = store.send(action).await?;
    handle.wait().await;
    Ok(())
}

async fn admin_dashboard(store: &AppStore) -> Result<()> {
    let handles = [
        store.send(AppAction::Subscription(SubscriptionAction::FetchSummary)).await?,
        store.send(AppAction::Subscription(SubscriptionAction::FetchWeeklyRevenue)).await?,
        store
            .send(AppAction::Subscription(SubscriptionAction::FetchSubscriptions {
                query: SubscriptionQuery::default(),
            }))
            .await?,
    ];
    for mut handle in handles {
        handle.wait().await;
    }

    let subscription = store.state(|s| s.subscription.clone()).await;

    match (subscription.summary.data(), subscription.summary.error()) {
        (Some(summary), _) => println!(
            "Subscriptions: {} total, {} active, revenue {:.2} ({:.2} this month)",
            summary.total_subscriptions,
            summary.active_subscriptions,
            summary.total_revenue,
            summary.monthly_revenue
        ),
        (None, error) => println!("Summary unavailable: {}", error.unwrap_or("no data")),
    }

    match (subscription.weekly_revenue.data(), subscription.weekly_revenue.error()) {
        (Some(revenue), _) => {
            println!("Weekly revenue: {:.2}", revenue.total);
            for point in &revenue.points {
                println!("  {:<5} {:>10.2}", point.label, point.amount);
            }
        },
        (None, error) => println!("Weekly revenue unavailable: {}", error.unwrap_or("no data")),
    }

    match (subscription.subscriptions.data(), subscription.subscriptions.error()) {
        (Some(page), _) => {
            println!(
                "Latest subscriptions (page {} of {}):",
                page.number() + 1,
                page.total_pages()
            );
            for row in page.content() {
                println!(
                    "  {:<28} {:<8} {:<9} {:>8.2}",
                    row.user_email,
                    row.plan.as_str(),
                    row.status.as_str(),
                    row.amount
                );
            }
        },
        (None, error) => println!("Subscriptions unavailable: {}", error.unwrap_or("no data")),
    }

    Ok(())
}

async fn class_listing(store: &AppStore) -> Result<()> {
    dispatch(store, AppAction::Classes(ClassesAction::Fetch(ClassQuery::default()))).await?;

    let classes = store.state(|s| s.classes.items.clone()).await;
    match (classes.data(), classes.error()) {
        (Some(page), _) => {
            println!("Classes ({} available):", page.total_elements());
            for class in page.content() {
                let seats = if class.is_full() { "full" } else { "open" };
                println!(
                    "  {:<24} {:<14} {:<6} {}",
                    class.title, class.subject, seats, class.teacher_name
                );
            }
        },
        (None, error) => println!("Classes unavailable: {}", error.unwrap_or("no data")),
    }

    Ok(())
}
