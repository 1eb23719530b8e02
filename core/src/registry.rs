use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{ScriptVariant, Translations};

/// A piece of static localized text in both Chinese scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScriptPair {
    pub traditional: &'static str,
    pub simplified: &'static str,
}

impl ScriptPair {
    pub const fn new(traditional: &'static str, simplified: &'static str) -> Self {
        Self { traditional, simplified }
    }

    pub fn get(&self, variant: ScriptVariant) -> &'static str {
        match variant {
            ScriptVariant::Traditional => self.traditional,
            ScriptVariant::Simplified => self.simplified,
        }
    }

    pub fn to_translations(&self) -> Translations {
        Translations::dual(self.traditional, self.simplified)
    }
}

// ── Topics ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicKey {
    #[default]
    Family,
    Animals,
    School,
    Food,
    Hobbies,
    Nature,
}

impl TopicKey {
    pub const ALL: [TopicKey; 6] = [
        TopicKey::Family,
        TopicKey::Animals,
        TopicKey::School,
        TopicKey::Food,
        TopicKey::Hobbies,
        TopicKey::Nature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TopicKey::Family => "family",
            TopicKey::Animals => "animals",
            TopicKey::School => "school",
            TopicKey::Food => "food",
            TopicKey::Hobbies => "hobbies",
            TopicKey::Nature => "nature",
        }
    }

    pub fn details(self) -> &'static Topic {
        match self {
            TopicKey::Family => &FAMILY,
            TopicKey::Animals => &ANIMALS,
            TopicKey::School => &SCHOOL,
            TopicKey::Food => &FOOD,
            TopicKey::Hobbies => &HOBBIES,
            TopicKey::Nature => &NATURE,
        }
    }
}

impl fmt::Display for TopicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TopicKey {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TopicKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("Unknown topic: {s}"))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Topic {
    pub key: TopicKey,
    /// English name, used inside English transition lines.
    pub name: &'static str,
    pub label: ScriptPair,
    pub icon: &'static str,
    pub welcome: &'static str,
    pub welcome_translation: ScriptPair,
    pub suggestions: [&'static str; 3],
}

impl Topic {
    pub fn seed_suggestions(&self) -> Vec<String> {
        self.suggestions.iter().map(|s| s.to_string()).collect()
    }
}

static FAMILY: Topic = Topic {
    key: TopicKey::Family,
    name: "my family",
    label: ScriptPair::new("我的家庭", "我的家庭"),
    icon: "👨‍👩‍👧‍👦",
    welcome: "Hi there! I'm QMEI, your English teacher! Let's talk about your family today. \
              Can you tell me about your family members?",
    welcome_translation: ScriptPair::new(
        "嗨！我是QMEI，你的英文老師！今天我們來聊聊你的家庭吧。你可以告訴我你的家庭成員嗎？",
        "嗨！我是QMEI，你的英文老师！今天我们来聊聊你的家庭吧。你可以告诉我你的家庭成员吗？",
    ),
    suggestions: [
        "I have a mom, dad, and sister",
        "My family is very loving",
        "We like to play together",
    ],
};

static ANIMALS: Topic = Topic {
    key: TopicKey::Animals,
    name: "animal friends",
    label: ScriptPair::new("動物朋友", "动物朋友"),
    icon: "🐾",
    welcome: "Hello! Today let's talk about animals! Do you have any pets? What's your favorite animal?",
    welcome_translation: ScriptPair::new(
        "你好！今天我們來聊聊動物吧！你有養寵物嗎？你最喜歡什麼動物？",
        "你好！今天我们来聊聊动物吧！你有养宠物吗？你最喜欢什么动物？",
    ),
    suggestions: [
        "I have a cute dog",
        "I love cats very much",
        "My favorite animal is elephant",
    ],
};

static SCHOOL: Topic = Topic {
    key: TopicKey::School,
    name: "school life",
    label: ScriptPair::new("學校生活", "学校生活"),
    icon: "🏫",
    welcome: "Hi! Let's talk about school life! What do you like most about school? Who are your friends?",
    welcome_translation: ScriptPair::new(
        "嗨！我們來聊聊學校生活吧！你最喜歡學校的什麼？你的朋友是誰？",
        "嗨！我们来聊聊学校生活吧！你最喜欢学校的什么？你的朋友是谁？",
    ),
    suggestions: [
        "I like my English class",
        "My best friend is Amy",
        "I enjoy playing at recess",
    ],
};

static FOOD: Topic = Topic {
    key: TopicKey::Food,
    name: "yummy food",
    label: ScriptPair::new("美味食物", "美味食物"),
    icon: "🍎",
    welcome: "Hello! Let's talk about food! What's your favorite food? Do you like fruits or vegetables?",
    welcome_translation: ScriptPair::new(
        "你好！我們來聊聊食物吧！你最喜歡什麼食物？你喜歡水果還是蔬菜？",
        "你好！我们来聊聊食物吧！你最喜欢什么食物？你喜欢水果还是蔬菜？",
    ),
    suggestions: [
        "I love pizza and ice cream",
        "My favorite fruit is apple",
        "I like eating vegetables",
    ],
};

static HOBBIES: Topic = Topic {
    key: TopicKey::Hobbies,
    name: "hobbies",
    label: ScriptPair::new("興趣愛好", "兴趣爱好"),
    icon: "🎨",
    welcome: "Hi! What do you like to do in your free time? Do you have any hobbies or favorite activities?",
    welcome_translation: ScriptPair::new(
        "嗨！你空閒時間喜歡做什麼？你有什麼興趣愛好或喜歡的活動嗎？",
        "嗨！你空闲时间喜欢做什么？你有什么兴趣爱好或喜欢的活动吗？",
    ),
    suggestions: [
        "I like drawing and painting",
        "I enjoy playing soccer",
        "Reading books is fun",
    ],
};

static NATURE: Topic = Topic {
    key: TopicKey::Nature,
    name: "nature",
    label: ScriptPair::new("大自然", "大自然"),
    icon: "🌳",
    welcome: "Hello! Let's explore nature together! Do you like going to the park? What do you see outside?",
    welcome_translation: ScriptPair::new(
        "你好！我們一起探索大自然吧！你喜歡去公園嗎？你在外面看到什麼？",
        "你好！我们一起探索大自然吧！你喜欢去公园吗？你在外面看到什么？",
    ),
    suggestions: [
        "I see beautiful flowers",
        "I like playing in the park",
        "The sky is blue today",
    ],
};

// ── Learning modes ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningMode {
    #[default]
    Dialogue,
    Sentence,
    Speech,
}

impl LearningMode {
    pub const ALL: [LearningMode; 3] = [LearningMode::Dialogue, LearningMode::Sentence, LearningMode::Speech];

    pub fn as_str(&self) -> &'static str {
        match self {
            LearningMode::Dialogue => "dialogue",
            LearningMode::Sentence => "sentence",
            LearningMode::Speech => "speech",
        }
    }

    pub fn details(self) -> &'static ModeDetails {
        match self {
            LearningMode::Dialogue => &DIALOGUE,
            LearningMode::Sentence => &SENTENCE,
            LearningMode::Speech => &SPEECH,
        }
    }
}

impl fmt::Display for LearningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LearningMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LearningMode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("Unknown learning mode: {s}"))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModeDetails {
    pub key: LearningMode,
    pub name: &'static str,
    pub label: ScriptPair,
    pub icon: &'static str,
}

static DIALOGUE: ModeDetails = ModeDetails {
    key: LearningMode::Dialogue,
    name: "dialogue",
    label: ScriptPair::new("情境對話練習", "情境对话练习"),
    icon: "💬",
};

static SENTENCE: ModeDetails = ModeDetails {
    key: LearningMode::Sentence,
    name: "sentence building",
    label: ScriptPair::new("單句生成練習", "单句生成练习"),
    icon: "📝",
};

static SPEECH: ModeDetails = ModeDetails {
    key: LearningMode::Speech,
    name: "short speech",
    label: ScriptPair::new("短文演說練習", "短文演说练习"),
    icon: "🎤",
};
