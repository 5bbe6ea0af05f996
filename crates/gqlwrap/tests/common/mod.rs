//! Operations and a tracing capture layer shared by the integration tests.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

mod schema {
    cynic::use_schema!("tests/schema.graphql");
}

#[derive(cynic::QueryFragment, Debug)]
#[cynic(schema_path = "tests/schema.graphql")]
pub struct User {
    pub id: i32,
    pub name: Option<String>,
}

#[derive(cynic::QueryFragment, Debug)]
#[cynic(schema_path = "tests/schema.graphql", graphql_type = "Query")]
pub struct ViewerQuery {
    pub viewer: Option<User>,
}

#[derive(cynic::QueryVariables, Debug)]
pub struct UserArguments {
    pub id: cynic::Id,
}

#[derive(cynic::QueryFragment, Debug)]
#[cynic(
    schema_path = "tests/schema.graphql",
    graphql_type = "Query",
    variables = "UserArguments"
)]
pub struct UserById {
    #[arguments(id: $id)]
    pub user: Option<User>,
}

#[derive(cynic::QueryVariables, Debug)]
pub struct InsertUserArguments {
    pub name: String,
}

#[derive(cynic::QueryFragment, Debug)]
#[cynic(
    schema_path = "tests/schema.graphql",
    graphql_type = "insert_user_mutation_response"
)]
pub struct InsertUserPayload {
    #[cynic(rename = "affected_rows")]
    pub affected_rows: i32,
}

#[derive(cynic::QueryFragment, Debug)]
#[cynic(
    schema_path = "tests/schema.graphql",
    graphql_type = "Mutation",
    variables = "InsertUserArguments"
)]
pub struct InsertUser {
    #[arguments(name: $name)]
    #[cynic(rename = "insert_user")]
    pub insert_user: InsertUserPayload,
}

pub fn user_by_id(id: &str) -> cynic::Operation<UserById, UserArguments> {
    use cynic::QueryBuilder;

    UserById::build(UserArguments {
        id: cynic::Id::new(id),
    })
}

pub fn insert_user(name: &str) -> cynic::Operation<InsertUser, InsertUserArguments> {
    use cynic::MutationBuilder;

    InsertUser::build(InsertUserArguments {
        name: name.to_string(),
    })
}

#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub fields: BTreeMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or_default()
    }
}

#[derive(Default)]
struct FieldVisitor(BTreeMap<String, String>);

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }
}

/// Records events on one target.
#[derive(Clone)]
pub struct Capture {
    target: &'static str,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl Capture {
    pub fn new(target: &'static str) -> Self {
        Self {
            target,
            events: Arc::default(),
        }
    }

    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().clone()
    }
}

impl<S: Subscriber> Layer<S> for Capture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target() != self.target {
            return;
        }
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.events.lock().push(CapturedEvent {
            level: *event.metadata().level(),
            fields: visitor.0,
        });
    }
}
