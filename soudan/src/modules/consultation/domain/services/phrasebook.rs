use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::super::value_objects::LanguageCode;

/// 本地化文本的键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PhraseKey {
    /// 会话开始或切换语言后的欢迎语
    Welcome,
    /// 危急回复后追加的紧急联络指引
    EmergencyGuidance,
    /// 咨询调用失败时的道歉与重试提示
    RetryApology,
    /// 输入框占位文本
    ComposerPlaceholder,
    /// 常驻的紧急电话提示
    EmergencyFooter,
}

/// 本地化文本表
///
/// 领域服务：按 (键, 语言) 查表，缺失时回退到默认语言。
/// 控制流只依赖查表结果，文本来源可以替换为外部翻译资源。
#[derive(Debug, Clone)]
pub struct Phrasebook {
    default_language: LanguageCode,
    entries: HashMap<PhraseKey, HashMap<String, String>>,
}

impl Phrasebook {
    /// 空表
    pub fn empty(default_language: LanguageCode) -> Self {
        Self {
            default_language,
            entries: HashMap::new(),
        }
    }

    /// 内置文本，默认语言为 `ja`
    pub fn builtin() -> Self {
        Self::builtin_with_default(LanguageCode::from("ja"))
    }

    /// 内置文本，使用指定的回退语言
    pub fn builtin_with_default(default_language: LanguageCode) -> Self {
        let mut book = Self::empty(default_language);
        for (key, table) in BUILTIN {
            for (code, text) in table.iter() {
                book.insert(*key, LanguageCode::from(*code), *text);
            }
        }
        book
    }

    /// 添加或覆盖一条文本
    pub fn insert(&mut self, key: PhraseKey, language: LanguageCode, text: impl Into<String>) {
        self.entries
            .entry(key)
            .or_default()
            .insert(language.code().to_string(), text.into());
    }

    pub fn default_language(&self) -> &LanguageCode {
        &self.default_language
    }

    pub fn set_default_language(&mut self, language: LanguageCode) {
        self.default_language = language;
    }

    /// 精确查找，不回退
    pub fn lookup(&self, key: PhraseKey, language: &LanguageCode) -> Option<&str> {
        self.entries
            .get(&key)?
            .get(language.code())
            .map(String::as_str)
    }

    /// 查找文本，缺失时回退到默认语言；两者都缺失时返回空串
    pub fn text(&self, key: PhraseKey, language: &LanguageCode) -> &str {
        self.lookup(key, language)
            .or_else(|| self.lookup(key, &self.default_language))
            .unwrap_or_else(|| {
                tracing::warn!(
                    "[Phrasebook] No text for {:?} in {} or default {}",
                    key,
                    language,
                    self.default_language
                );
                ""
            })
    }

    pub fn welcome(&self, language: &LanguageCode) -> &str {
        self.text(PhraseKey::Welcome, language)
    }

    pub fn emergency_guidance(&self, language: &LanguageCode) -> &str {
        self.text(PhraseKey::EmergencyGuidance, language)
    }

    pub fn retry_apology(&self, language: &LanguageCode) -> &str {
        self.text(PhraseKey::RetryApology, language)
    }

    pub fn placeholder(&self, language: &LanguageCode) -> &str {
        self.text(PhraseKey::ComposerPlaceholder, language)
    }

    pub fn footer(&self, language: &LanguageCode) -> &str {
        self.text(PhraseKey::EmergencyFooter, language)
    }
}

impl Default for Phrasebook {
    fn default() -> Self {
        Self::builtin()
    }
}

type Table = &'static [(&'static str, &'static str)];

const BUILTIN: &[(PhraseKey, Table)] = &[
    (PhraseKey::Welcome, WELCOME),
    (PhraseKey::EmergencyGuidance, EMERGENCY),
    (PhraseKey::RetryApology, RETRY),
    (PhraseKey::ComposerPlaceholder, PLACEHOLDER),
    (PhraseKey::EmergencyFooter, FOOTER),
];

const WELCOME: Table = &[
    ("ja", "こんにちは！24時間対応のAI相談サービスです。お困りのことがあれば、お気軽にご相談ください。"),
    ("en", "Hello! This is a 24/7 AI consultation service. Please feel free to ask if you have any concerns."),
    ("vi", "Xin chào! Đây là dịch vụ tư vấn AI 24/7. Hãy thoải mái hỏi nếu bạn có bất kỳ thắc mắc nào."),
    ("zh", "您好！这是24小时AI咨询服务。如果您有任何问题，请随时咨询。"),
    ("fil", "Kumusta! Ito ay 24/7 AI consultation service. Huwag mag-atubiling magtanong kung may mga alalahanin kayo."),
    ("id", "Halo! Ini adalah layanan konsultasi AI 24/7. Jangan ragu untuk bertanya jika Anda memiliki kekhawatiran."),
    ("th", "สวัสดี! นี่คือบริการปรึกษา AI ตลอด 24 ชั่วโมง โปรดอย่าลังเลที่จะถามหากคุณมีข้อกังวล"),
    ("my", "မင်္ဂလာပါ! ၎င်းသည် ၂၄ နာရီ AI အကြံပေးဝန်ဆောင်မှုဖြစ်သည်။ သင့်တွင် စိုးရိမ်စရာများရှိပါက လွတ်လပ်စွာမေးမြန်းပါ။"),
    ("km", "សួស្តី! នេះគឺជាសេវាកម្មប្រឹក្សា AI ២៤/៧។ សូមកុំរៀបរៀងក្នុងការសួរប្រសិនបើអ្នកមានការព្រួយបារម្ភ។"),
    ("ne", "नमस्ते! यो २४/७ AI परामर्श सेवा हो। यदि तपाईंसँग कुनै चिन्ता छ भने निःसंकोच सोध्नुहोस्।"),
    ("mn", "Сайн байна уу! Энэ бол 24/7 AI зөвлөгөө өгөх үйлчилгээ юм. Хэрэв танд ямар нэгэн асуудал байвал чөлөөтэй асуугаарай."),
];

const EMERGENCY: Table = &[
    ("ja", "緊急事態を検出しました。すぐに人間のスタッフにお繋ぎします。緊急の場合は110番（警察）、119番（救急・消防）にお電話ください。"),
    ("en", "Emergency detected. Connecting you to human staff immediately. For emergencies, call 110 (Police) or 119 (Ambulance/Fire)."),
    ("vi", "Phát hiện tình huống khẩn cấp. Đang kết nối bạn với nhân viên ngay lập tức. Trong trường hợp khẩn cấp, hãy gọi 110 (Cảnh sát) hoặc 119 (Cứu thương/Cứu hỏa)."),
];

const RETRY: Table = &[
    ("ja", "申し訳ありませんが、一時的な問題が発生しました。しばらく待ってから再度お試しください。"),
    ("en", "Sorry, there was a temporary issue. Please wait a moment and try again."),
    ("vi", "Xin lỗi, đã xảy ra sự cố tạm thời. Vui lòng đợi một chút và thử lại."),
];

const PLACEHOLDER: Table = &[
    ("ja", "メッセージを入力..."),
    ("en", "Type your message..."),
    ("vi", "Type your message..."),
    ("zh", "Type your message..."),
    ("fil", "Type your message..."),
    ("id", "Type your message..."),
    ("th", "Type your message..."),
    ("my", "Type your message..."),
    ("km", "Type your message..."),
    ("ne", "Type your message..."),
    ("mn", "Type your message..."),
];

const FOOTER: Table = &[
    ("ja", "緊急時は110番（警察）、119番（救急・消防）にお電話ください"),
    ("en", "In an emergency, call 110 (Police) or 119 (Ambulance/Fire)"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::consultation::domain::value_objects::LanguageCatalog;

    #[test]
    fn test_welcome_for_every_catalog_language() {
        let book = Phrasebook::builtin();
        for lang in LanguageCatalog::all() {
            let code = LanguageCode::from(lang.code);
            assert!(
                book.lookup(PhraseKey::Welcome, &code).is_some(),
                "missing welcome for {}",
                lang.code
            );
        }
    }

    #[test]
    fn test_emergency_falls_back_to_default() {
        let book = Phrasebook::builtin();
        let th = LanguageCode::from("th");
        let ja = LanguageCode::from("ja");
        assert!(book.lookup(PhraseKey::EmergencyGuidance, &th).is_none());
        assert_eq!(book.emergency_guidance(&th), book.emergency_guidance(&ja));
    }

    #[test]
    fn test_configurable_default_language() {
        let book = Phrasebook::builtin_with_default(LanguageCode::from("en"));
        let retry = book.retry_apology(&LanguageCode::from("mn"));
        assert_eq!(
            retry,
            "Sorry, there was a temporary issue. Please wait a moment and try again."
        );
    }

    #[test]
    fn test_emergency_guidance_mentions_numbers() {
        let book = Phrasebook::builtin();
        let text = book.emergency_guidance(&LanguageCode::from("en"));
        assert!(text.contains("110"));
        assert!(text.contains("119"));
    }

    #[test]
    fn test_missing_everywhere_is_empty() {
        let book = Phrasebook::empty(LanguageCode::from("ja"));
        assert_eq!(book.welcome(&LanguageCode::from("en")), "");
    }

    #[test]
    fn test_insert_overrides_builtin() {
        let mut book = Phrasebook::builtin();
        book.insert(PhraseKey::Welcome, LanguageCode::from("en"), "Hi there");
        assert_eq!(book.welcome(&LanguageCode::from("en")), "Hi there");
    }
}
