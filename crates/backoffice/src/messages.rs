//! Status lines in the configured console language.

use backoffice_config::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Added,
    Updated,
    Deleted,
    SignedIn,
    SignedOut,
    NotSignedIn,
    ProfileSaved,
    LanguageSet,
    ConfirmDelete,
}

/// Entity noun for `resource` ("users", "products").
fn noun(lang: Language, resource: &str) -> &'static str {
    match (lang, resource) {
        (Language::En, "users") => "User",
        (Language::En, _) => "Product",
        (Language::Ru, "users") => "Пользователь",
        (Language::Ru, _) => "Товар",
        (Language::Uz, "users") => "Foydalanuvchi",
        (Language::Uz, _) => "Mahsulot",
    }
}

/// A fixed message.
pub fn text(lang: Language, msg: Message) -> &'static str {
    match (lang, msg) {
        (Language::En, Message::SignedIn) => "Signed in",
        (Language::En, Message::SignedOut) => "Signed out",
        (Language::En, Message::NotSignedIn) => "Not signed in",
        (Language::En, Message::ProfileSaved) => "Profile updated successfully!",
        (Language::En, Message::LanguageSet) => "Language set to English",

        (Language::Ru, Message::SignedIn) => "Вход выполнен",
        (Language::Ru, Message::SignedOut) => "Выход выполнен",
        (Language::Ru, Message::NotSignedIn) => "Вход не выполнен",
        (Language::Ru, Message::ProfileSaved) => "Профиль успешно обновлён!",
        (Language::Ru, Message::LanguageSet) => "Выбран русский язык",

        (Language::Uz, Message::SignedIn) => "Tizimga kirildi",
        (Language::Uz, Message::SignedOut) => "Tizimdan chiqildi",
        (Language::Uz, Message::NotSignedIn) => "Tizimga kirilmagan",
        (Language::Uz, Message::ProfileSaved) => "Profil muvaffaqiyatli yangilandi!",
        (Language::Uz, Message::LanguageSet) => "Til o'zbekchaga o'zgartirildi",

        (_, Message::Added | Message::Updated | Message::Deleted | Message::ConfirmDelete) => "",
    }
}

/// A message about one record of `resource`.
pub fn record(lang: Language, msg: Message, resource: &str, id: &str) -> String {
    let noun = noun(lang, resource);
    match (lang, msg) {
        (Language::En, Message::Added) => format!("{noun} added successfully"),
        (Language::En, Message::Updated) => format!("{noun} updated successfully"),
        (Language::En, Message::Deleted) => format!("{noun} deleted successfully"),
        (Language::En, Message::ConfirmDelete) => format!("Delete {} {id}?", noun.to_lowercase()),

        (Language::Ru, Message::Added) => format!("{noun} успешно добавлен"),
        (Language::Ru, Message::Updated) => format!("{noun} успешно обновлён"),
        (Language::Ru, Message::Deleted) => format!("{noun} успешно удалён"),
        (Language::Ru, Message::ConfirmDelete) => format!("Удалить: {noun} {id}?"),

        (Language::Uz, Message::Added) => format!("{noun} muvaffaqiyatli qo'shildi"),
        (Language::Uz, Message::Updated) => format!("{noun} muvaffaqiyatli yangilandi"),
        (Language::Uz, Message::Deleted) => format!("{noun} muvaffaqiyatli o'chirildi"),
        (Language::Uz, Message::ConfirmDelete) => format!("{noun} {id} o'chirilsinmi?"),

        (lang, other) => text(lang, other).to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn record_messages_follow_language() {
        assert_eq!(
            record(Language::En, Message::Deleted, "users", "3"),
            "User deleted successfully"
        );
        assert_eq!(
            record(Language::Ru, Message::Added, "products", "3"),
            "Товар успешно добавлен"
        );
        assert_eq!(
            record(Language::En, Message::ConfirmDelete, "products", "12"),
            "Delete product 12?"
        );
    }

    #[test]
    fn every_language_has_session_messages() {
        for lang in Language::iter() {
            for msg in [Message::SignedIn, Message::SignedOut, Message::ProfileSaved] {
                assert!(!text(lang, msg).is_empty(), "{lang} {msg:?}");
            }
        }
    }
}
