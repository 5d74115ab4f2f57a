//! Shared fixtures for persister tests.

use crate::{
    convert::ConverterRegistry,
    ledger::MemoryLedger,
    model::{
        Association, ClassMetadata, CollectionStrategy, DiscriminatorMap, FieldMapping,
        MetadataRegistry,
    },
    persist::Persister,
    value::Document,
};
use docmap_config::PersisterConfig;
use docmap_primitives::ScalarKind;
use ulid::Ulid;

pub const PROFILE: &str = "app::Profile";
pub const ADDRESS: &str = "app::Address";
pub const GEO: &str = "app::Geo";
pub const COMMENT: &str = "app::Comment";
pub const BOOK: &str = "app::Book";
pub const DISC: &str = "app::Disc";
pub const CAT: &str = "app::Cat";
pub const DOG: &str = "app::Dog";
pub const ACCOUNT: &str = "app::Account";
pub const ENTRY: &str = "app::Entry";
pub const TAG: &str = "app::Tag";

/// Deterministic identifier for fixtures.
#[must_use]
pub fn id(n: u128) -> Ulid {
    Ulid::from_parts(1_700_000_000_000, n)
}

fn media_map() -> DiscriminatorMap {
    DiscriminatorMap::new([("book", BOOK), ("disc", DISC)]).expect("media map is valid")
}

#[expect(clippy::too_many_lines)]
fn classes() -> Vec<ClassMetadata> {
    vec![
        ClassMetadata::document(PROFILE)
            .fields([
                FieldMapping::identifier("id", ScalarKind::Id),
                FieldMapping::scalar("name", ScalarKind::Text),
                FieldMapping::scalar("email", ScalarKind::Text).allow_null(),
                FieldMapping::scalar("nickname", ScalarKind::Text)
                    .stored_as("nick")
                    .allow_null(),
                FieldMapping::increment("score", ScalarKind::Int),
                FieldMapping::increment("rating", ScalarKind::Float),
                FieldMapping::collection("tags").with_strategy(CollectionStrategy::Set),
                FieldMapping::collection("labels"),
                FieldMapping::reference_one("owner", Association::pinned(PROFILE)).allow_null(),
                FieldMapping::embed_one("address", Association::pinned(ADDRESS)),
                FieldMapping::embed_one("backup", Association::pinned(ADDRESS)).allow_null(),
                FieldMapping::reference_many("friends", Association::pinned(PROFILE)),
                FieldMapping::embed_many("comments", Association::pinned(COMMENT)),
                FieldMapping::embed_many(
                    "media",
                    Association::polymorphic()
                        .with_discriminator_field("kind")
                        .with_discriminator_map(media_map()),
                ),
                FieldMapping::embed_many("shelf", Association::polymorphic())
                    .with_strategy(CollectionStrategy::Set),
                FieldMapping::reference_one("pet", Association::polymorphic()).allow_null(),
                FieldMapping::scalar("cache", ScalarKind::Text).transient(),
            ])
            .build()
            .expect("profile mapping is valid"),
        ClassMetadata::embedded(ADDRESS)
            .fields([
                FieldMapping::scalar("street", ScalarKind::Text),
                FieldMapping::scalar("city", ScalarKind::Text),
                FieldMapping::embed_one("geo", Association::pinned(GEO)).allow_null(),
                FieldMapping::reference_one("resident", Association::pinned(PROFILE)),
            ])
            .build()
            .expect("address mapping is valid"),
        ClassMetadata::embedded(GEO)
            .fields([
                FieldMapping::scalar("lat", ScalarKind::Float),
                FieldMapping::scalar("lng", ScalarKind::Float),
            ])
            .build()
            .expect("geo mapping is valid"),
        ClassMetadata::embedded(COMMENT)
            .fields([
                FieldMapping::scalar("body", ScalarKind::Text),
                FieldMapping::increment("votes", ScalarKind::Int),
                FieldMapping::reference_one("author", Association::pinned(PROFILE)).allow_null(),
            ])
            .build()
            .expect("comment mapping is valid"),
        ClassMetadata::embedded(BOOK)
            .field(FieldMapping::scalar("title", ScalarKind::Text))
            .build()
            .expect("book mapping is valid"),
        ClassMetadata::embedded(DISC)
            .field(FieldMapping::scalar("minutes", ScalarKind::Int))
            .build()
            .expect("disc mapping is valid"),
        ClassMetadata::document(CAT)
            .collection("pets")
            .discriminator("type", "cat")
            .fields([
                FieldMapping::identifier("id", ScalarKind::Id),
                FieldMapping::scalar("name", ScalarKind::Text),
            ])
            .build()
            .expect("cat mapping is valid"),
        ClassMetadata::document(DOG)
            .collection("pets")
            .discriminator("type", "dog")
            .fields([
                FieldMapping::identifier("id", ScalarKind::Id),
                FieldMapping::scalar("name", ScalarKind::Text),
            ])
            .build()
            .expect("dog mapping is valid"),
        ClassMetadata::document(ACCOUNT)
            .collection("accounts")
            .database("crm")
            .field(FieldMapping::identifier("id", ScalarKind::Int))
            .build()
            .expect("account mapping is valid"),
        ClassMetadata::document(ENTRY)
            .fields([
                FieldMapping::identifier("id", ScalarKind::Id),
                FieldMapping::scalar("name", ScalarKind::Text),
                FieldMapping::increment("score", ScalarKind::Int),
                FieldMapping::collection("tags").with_strategy(CollectionStrategy::Set),
                FieldMapping::embed_many("badges", Association::pinned(TAG))
                    .with_strategy(CollectionStrategy::Set),
                FieldMapping::reference_one("owner", Association::pinned(ACCOUNT)).allow_null(),
            ])
            .build()
            .expect("entry mapping is valid"),
        ClassMetadata::embedded(TAG)
            .field(FieldMapping::scalar("name", ScalarKind::Text))
            .build()
            .expect("tag mapping is valid"),
    ]
}

/// Fixture registry with every test class.
#[must_use]
pub fn registry() -> MetadataRegistry {
    MetadataRegistry::from_classes(classes()).expect("fixture registry is valid")
}

///
/// Harness
///
/// Owns the collaborators a [`Persister`] borrows.
///

pub struct Harness {
    pub config: PersisterConfig,
    pub registry: MetadataRegistry,
    pub ledger: MemoryLedger,
    pub converters: ConverterRegistry,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    #[must_use]
    pub fn new() -> Self {
        let config = PersisterConfig::default();
        let registry = registry();
        registry
            .validate_reserved_names(&config)
            .expect("fixture names are not reserved");

        Self {
            config,
            registry,
            ledger: MemoryLedger::new(),
            converters: ConverterRegistry::new(),
        }
    }

    #[must_use]
    pub fn persister(&self) -> Persister<'_> {
        Persister::new(&self.config, &self.registry, &self.ledger, &self.converters)
    }
}

/// Profile with an identifier and a name.
#[must_use]
pub fn profile(n: u128, name: &str) -> Document {
    Document::new(PROFILE).with("id", id(n)).with("name", name)
}

#[must_use]
pub fn address(street: &str, city: &str) -> Document {
    Document::new(ADDRESS)
        .with("street", street)
        .with("city", city)
}
