use std::collections::BTreeSet;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TipError {
    #[error("no health tip with id {0}")]
    UnknownTip(u8),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
pub enum TipCategory {
    Nutrition,
    Exercise,
    MentalHealth,
    Reproductive,
    General,
}

impl TipCategory {
    pub fn label(self) -> &'static str {
        match self {
            TipCategory::Nutrition => "Nutrition",
            TipCategory::Exercise => "Exercise",
            TipCategory::MentalHealth => "Mental Health",
            TipCategory::Reproductive => "Reproductive Health",
            TipCategory::General => "General Wellness",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Serialize)]
pub struct HealthTip {
    pub id: u8,
    pub title: &'static str,
    pub summary: &'static str,
    pub details: &'static str,
    pub category: TipCategory,
    pub read_minutes: u8,
    pub difficulty: Difficulty,
    pub author: &'static str,
    pub practical: &'static [&'static str],
    pub warnings: &'static [&'static str],
}

pub const TIP_OF_THE_DAY: &str = "Small, consistent changes in your daily routine can lead to significant improvements in your overall health. Focus on progress, not perfection.";

pub static TIPS: [HealthTip; 6] = [
    HealthTip {
        id: 1,
        title: "Iron-Rich Foods for Women",
        summary: "Women need more iron than men due to menstruation. Include spinach, lentils, quinoa, and lean meats in your diet.",
        details: "Iron deficiency is one of the most common nutritional deficiencies among women during the reproductive years, mostly because monthly blood loss depletes iron stores over time.",
        category: TipCategory::Nutrition,
        read_minutes: 3,
        difficulty: Difficulty::Easy,
        author: "Dr. Sarah Johnson",
        practical: &[
            "Pair iron-rich foods with vitamin C sources like citrus fruits to enhance absorption",
            "Cook in cast iron cookware to increase iron content in foods",
            "Avoid drinking tea or coffee with iron-rich meals",
            "Include both heme iron (meat) and non-heme iron (plants) in your diet",
        ],
        warnings: &[
            "Consult your doctor before taking iron supplements",
            "Too much iron can be harmful, get tested before supplementing",
        ],
    },
    HealthTip {
        id: 2,
        title: "Pelvic Floor Exercises",
        summary: "Strengthen your pelvic floor muscles with Kegel exercises. Contract for 3 seconds, then relax for 3 seconds.",
        details: "The pelvic floor muscles support the bladder, uterus and rectum. They can weaken with pregnancy, childbirth, aging or surgery.",
        category: TipCategory::Exercise,
        read_minutes: 5,
        difficulty: Difficulty::Medium,
        author: "Physical Therapist Lisa Chen",
        practical: &[
            "Start with 10 repetitions, 3 times daily",
            "Gradually increase to 15-20 repetitions",
            "Focus on both quick contractions and longer holds",
            "Practice during daily activities like brushing teeth",
        ],
        warnings: &[
            "Stop if you experience pain",
            "Consult a pelvic floor specialist if you have ongoing issues",
        ],
    },
    HealthTip {
        id: 3,
        title: "Managing Stress During Your Cycle",
        summary: "Hormonal changes can affect stress levels. Practice deep breathing, meditation, or gentle yoga during PMS.",
        details: "Hormonal fluctuations across the menstrual cycle can change mood, stress levels and emotional well-being. Knowing the pattern helps you plan coping strategies.",
        category: TipCategory::MentalHealth,
        read_minutes: 4,
        difficulty: Difficulty::Easy,
        author: "Dr. Maria Rodriguez",
        practical: &[
            "Track your mood alongside your cycle to identify patterns",
            "Practice the 4-7-8 breathing technique",
            "Try progressive muscle relaxation before bed",
            "Consider magnesium supplements after consulting your doctor",
        ],
        warnings: &[
            "Seek professional help if mood changes are severe",
            "Don't ignore persistent anxiety or depression",
        ],
    },
    HealthTip {
        id: 4,
        title: "Understanding Your Fertile Window",
        summary: "Track your menstrual cycle to identify your fertile window. Use ovulation predictor kits or monitor basal body temperature.",
        details: "The fertile window spans about 6 days of each cycle. Knowing it matters whether you are trying to conceive or to avoid pregnancy.",
        category: TipCategory::Reproductive,
        read_minutes: 6,
        difficulty: Difficulty::Medium,
        author: "Fertility Specialist Dr. Amanda Lee",
        practical: &[
            "The fertile window includes the 5 days before ovulation and the day of ovulation",
            "Cervical mucus changes can indicate fertility",
            "Basal body temperature rises after ovulation",
            "Ovulation predictor kits detect the LH surge",
        ],
        warnings: &[
            "Fertility tracking is not 100% reliable for contraception",
            "Consult a healthcare provider for personalized advice",
        ],
    },
    HealthTip {
        id: 5,
        title: "Calcium and Bone Health",
        summary: "Women are at higher risk for osteoporosis. Aim for 1000-1200mg of calcium daily through dairy, leafy greens, and fortified foods.",
        details: "Women have a higher risk of osteoporosis, especially after menopause when estrogen levels decline.",
        category: TipCategory::Nutrition,
        read_minutes: 4,
        difficulty: Difficulty::Easy,
        author: "Nutritionist Emily Davis",
        practical: &[
            "Combine calcium with vitamin D for better absorption",
            "Weight-bearing exercises strengthen bones",
            "Limit caffeine and alcohol",
            "Include magnesium and vitamin K for bone health",
        ],
        warnings: &[
            "Too much calcium can interfere with other mineral absorption",
            "Get a bone density test if you have risk factors",
        ],
    },
    HealthTip {
        id: 6,
        title: "Sleep Hygiene for Hormonal Balance",
        summary: "Quality sleep is crucial for hormone regulation. Keep a consistent sleep schedule and a cool, dark bedroom.",
        details: "Sleep regulates stress and reproductive hormones alike. Poor sleep can disrupt your menstrual cycle and overall health.",
        category: TipCategory::General,
        read_minutes: 5,
        difficulty: Difficulty::Easy,
        author: "Sleep Specialist Dr. Jennifer Kim",
        practical: &[
            "Keep your bedroom between 18-20°C (65-68°F)",
            "Use blackout curtains or an eye mask",
            "Avoid screens 1 hour before bedtime",
            "Try a relaxing bedtime routine like reading or gentle stretching",
        ],
        warnings: &[
            "Consult a doctor if you have persistent sleep problems",
            "Sleep disorders can affect hormone balance",
        ],
    },
];

pub fn find(id: u8) -> Option<&'static HealthTip> {
    TIPS.iter().find(|t| t.id == id)
}

/// All tips, or only those in `category`.
pub fn by_category(category: Option<TipCategory>) -> impl Iterator<Item = &'static HealthTip> {
    TIPS.iter()
        .filter(move |t| category.map_or(true, |c| t.category == c))
}

/// Ids of bookmarked tips.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bookmarks {
    pub ids: BTreeSet<u8>,
}

impl Bookmarks {
    /// Flip the bookmark on `id`; returns whether it is now bookmarked.
    pub fn toggle(&mut self, id: u8) -> Result<bool, TipError> {
        if find(id).is_none() {
            return Err(TipError::UnknownTip(id));
        }
        if self.ids.remove(&id) {
            Ok(false)
        } else {
            self.ids.insert(id);
            Ok(true)
        }
    }

    pub fn tips(&self) -> impl Iterator<Item = &'static HealthTip> + '_ {
        self.ids.iter().filter_map(|&id| find(id))
    }
}
