//! The Star Wars fixture: an in-memory character database and the classic
//! trilogy schema built with the dynamic schema API.
//!
//! `Human` and `Droid` both implement the cyclic `Character` interface
//! (characters have friends, who are characters), which is what the field
//! thunks exist for.

use std::{collections::HashMap, sync::Arc};

use crate::{
    ast::Type,
    schema::{
        meta::{Argument, EnumMeta, EnumValue, Field, InterfaceMeta, ObjectMeta},
        model::{Schema, SchemaError},
    },
    value::{Object, Value},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Episode {
    NewHope,
    Empire,
    Jedi,
}

impl Episode {
    fn as_str(self) -> &'static str {
        match self {
            Episode::NewHope => "NEWHOPE",
            Episode::Empire => "EMPIRE",
            Episode::Jedi => "JEDI",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "NEWHOPE" => Some(Episode::NewHope),
            "EMPIRE" => Some(Episode::Empire),
            "JEDI" => Some(Episode::Jedi),
            _ => None,
        }
    }
}

/// The in-memory character store handed to resolvers as the context value.
#[derive(Clone, Debug, Default)]
pub(crate) struct Database {
    characters: HashMap<String, Value>,
}

fn character(
    kind: &str,
    id: &str,
    name: &str,
    friend_ids: &[&str],
    appears_in: &[Episode],
    extra_field: &str,
    extra_value: Option<&str>,
) -> Value {
    let mut o = Object::new();
    o.add_field("type", Value::from(kind));
    o.add_field("id", Value::from(id));
    o.add_field("name", Value::from(name));
    o.add_field(
        "friendIds",
        Value::List(friend_ids.iter().map(|id| Value::from(*id)).collect()),
    );
    o.add_field(
        "appearsIn",
        Value::List(
            appears_in
                .iter()
                .map(|e| Value::from(e.as_str()))
                .collect(),
        ),
    );
    o.add_field(extra_field, Value::from(extra_value));
    Value::Object(o)
}

impl Database {
    pub(crate) fn new() -> Self {
        let trilogy = &[Episode::NewHope, Episode::Empire, Episode::Jedi];
        let mut characters = HashMap::new();

        characters.insert(
            "1000".into(),
            character(
                "human",
                "1000",
                "Luke Skywalker",
                &["1002", "1003", "2000", "2001"],
                trilogy,
                "homePlanet",
                Some("Tatooine"),
            ),
        );
        characters.insert(
            "1001".into(),
            character(
                "human",
                "1001",
                "Darth Vader",
                &["1004"],
                trilogy,
                "homePlanet",
                Some("Tatooine"),
            ),
        );
        characters.insert(
            "1002".into(),
            character(
                "human",
                "1002",
                "Han Solo",
                &["1000", "1003", "2001"],
                trilogy,
                "homePlanet",
                None,
            ),
        );
        characters.insert(
            "1003".into(),
            character(
                "human",
                "1003",
                "Leia Organa",
                &["1000", "1002", "2000", "2001"],
                trilogy,
                "homePlanet",
                Some("Alderaan"),
            ),
        );
        characters.insert(
            "1004".into(),
            character(
                "human",
                "1004",
                "Wilhuff Tarkin",
                &["1001"],
                &[Episode::NewHope],
                "homePlanet",
                None,
            ),
        );

        characters.insert(
            "2000".into(),
            character(
                "droid",
                "2000",
                "C-3PO",
                &["1000", "1002", "1003", "2001"],
                trilogy,
                "primaryFunction",
                Some("Protocol"),
            ),
        );
        characters.insert(
            "2001".into(),
            character(
                "droid",
                "2001",
                "R2-D2",
                &["1000", "1002", "1003"],
                trilogy,
                "primaryFunction",
                Some("Astromech"),
            ),
        );

        Self { characters }
    }

    pub(crate) fn get_character(&self, id: &str) -> Option<Value> {
        self.characters.get(id).cloned()
    }

    pub(crate) fn get_hero(&self, episode: Option<Episode>) -> Value {
        let id = if episode == Some(Episode::Empire) {
            // Luke is the hero of Episode V.
            "1000"
        } else {
            // R2-D2 is the hero of the whole saga.
            "2001"
        };
        self.characters[id].clone()
    }

    pub(crate) fn get_friends(&self, source: &Value) -> Vec<Value> {
        source
            .as_object_value()
            .and_then(|o| o.get_field_value("friendIds"))
            .and_then(Value::as_list_value)
            .into_iter()
            .flatten()
            .filter_map(|id| id.as_string_value())
            .filter_map(|id| self.get_character(id))
            .collect()
    }
}

fn character_kind(value: &Value) -> Option<&str> {
    value
        .as_object_value()
        .and_then(|o| o.get_field_value("type"))
        .and_then(Value::as_string_value)
}

fn character_fields() -> Vec<Field> {
    vec![
        Field::new("id", Type::NonNullNamed("String".into()))
            .description("The id of the character"),
        Field::new("name", Type::Named("String".into()))
            .description("The name of the character"),
        Field::new(
            "friends",
            Type::List(Box::new(Type::Named("Character".into()))),
        )
        .description("The friends of the character, or an empty list if they have none")
        .resolve_with(|params| {
            let database = params
                .context_as::<Database>()
                .ok_or("Database context missing")?;
            Ok(Value::List(database.get_friends(params.source)))
        }),
        Field::new(
            "appearsIn",
            Type::List(Box::new(Type::Named("Episode".into()))),
        )
        .description("Which movies they appear in"),
        Field::new("secretBackstory", Type::Named("String".into()))
            .description("All secrets about their past")
            .resolve_with(|_| Err("secretBackstory is secret.".into())),
    ]
}

fn episode_argument() -> Argument {
    Argument::new("episode", Type::Named("Episode".into())).description(
        "If omitted, returns the hero of the whole saga. If provided, returns the hero of \
         that particular episode",
    )
}

/// Builds the trilogy schema.
pub(crate) fn schema() -> Result<Arc<Schema>, SchemaError> {
    let episode = EnumMeta::new(
        "Episode",
        vec![
            EnumValue::new("NEWHOPE").description("Released in 1977."),
            EnumValue::new("EMPIRE").description("Released in 1980."),
            EnumValue::new("JEDI").description("Released in 1983."),
        ],
    )
    .description("One of the films in the Star Wars Trilogy");

    let character = InterfaceMeta::with_fields_thunk("Character", character_fields)
        .description("A character in the Star Wars Trilogy")
        .resolve_type(|value| match character_kind(value) {
            Some("human") => Some("Human".into()),
            Some("droid") => Some("Droid".into()),
            _ => None,
        });

    let human = ObjectMeta::with_fields_thunk("Human", || {
        let mut fields = character_fields();
        fields.push(
            Field::new("homePlanet", Type::Named("String".into()))
                .description("The home planet of the human, or null if unknown"),
        );
        fields
    })
    .description("A humanoid creature in the Star Wars universe.")
    .interfaces(&["Character"])
    .is_type_of(|value| character_kind(value) == Some("human"));

    let droid = ObjectMeta::with_fields_thunk("Droid", || {
        let mut fields = character_fields();
        fields.push(
            Field::new("primaryFunction", Type::Named("String".into()))
                .description("The primary function of the droid"),
        );
        fields
    })
    .description("A mechanical creature in the Star Wars universe.")
    .interfaces(&["Character"])
    .is_type_of(|value| character_kind(value) == Some("droid"));

    let query = ObjectMeta::new(
        "Query",
        vec![
            Field::new("hero", Type::Named("Character".into()))
                .argument(episode_argument())
                .resolve_with(|params| {
                    let database = params
                        .context_as::<Database>()
                        .ok_or("Database context missing")?;
                    let episode = params
                        .args
                        .get::<Option<String>>("episode")?
                        .as_deref()
                        .and_then(Episode::from_name);
                    Ok(database.get_hero(episode))
                }),
            Field::new("human", Type::Named("Human".into()))
                .argument(Argument::new(
                    "id",
                    Type::NonNullNamed("String".into()),
                ))
                .resolve_with(|params| {
                    let database = params
                        .context_as::<Database>()
                        .ok_or("Database context missing")?;
                    let id: String = params.args.get("id")?;
                    Ok(database
                        .get_character(&id)
                        .filter(|c| character_kind(c) == Some("human"))
                        .unwrap_or(Value::Null))
                }),
            Field::new("droid", Type::Named("Droid".into()))
                .argument(Argument::new(
                    "id",
                    Type::NonNullNamed("String".into()),
                ))
                .resolve_with(|params| {
                    let database = params
                        .context_as::<Database>()
                        .ok_or("Database context missing")?;
                    let id: String = params.args.get("id")?;
                    Ok(database
                        .get_character(&id)
                        .filter(|c| character_kind(c) == Some("droid"))
                        .unwrap_or(Value::Null))
                }),
        ],
    )
    .description("The root query object of the schema");

    Schema::build()
        .query(query)
        .register(episode.into_meta())
        .register(character.into_meta())
        .register(human.into_meta())
        .register(droid.into_meta())
        .finish()
}
