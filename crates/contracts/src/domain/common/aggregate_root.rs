use super::EntityMetadata;

/// Общий интерфейс записей справочников и документов.
pub trait AggregateRoot {
    type Id;

    fn id(&self) -> Self::Id;

    /// Бизнес-код ("DLR-0001", "POL-000123")
    fn code(&self) -> &str;

    fn description(&self) -> &str;

    fn metadata(&self) -> &EntityMetadata;

    fn metadata_mut(&mut self) -> &mut EntityMetadata;

    /// Таблица SQLite, она же префикс ключа страницы ("a001_dealer")
    fn table_name() -> &'static str;

    /// Подпись во множественном числе ("Dealers")
    fn list_name() -> &'static str;
}
