//! Items carried, worn and dropped by combatants.

use crate::action::DamageType;

/// Equipment slot an item occupies while worn.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum WearSlot {
    Head,
    Neck,
    Torso,
    Arms,
    Wrist,
    Hands,
    Finger,
    Waist,
    Legs,
    Feet,
    Shield,
    Held,
    Wielded,
}

impl WearSlot {
    /// Slots that hold protective armor.
    pub const ARMOR: [WearSlot; 10] = [
        WearSlot::Head,
        WearSlot::Neck,
        WearSlot::Torso,
        WearSlot::Arms,
        WearSlot::Wrist,
        WearSlot::Hands,
        WearSlot::Waist,
        WearSlot::Legs,
        WearSlot::Feet,
        WearSlot::Shield,
    ];
}

/// Armor categories; each damage type is absorbed by exactly one.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ArmorCategory {
    Slash,
    Pierce,
    Blunt,
    Magic,
}

/// Absorption percentages contributed by a piece of armor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArmorRating {
    pub slash: u8,
    pub pierce: u8,
    pub blunt: u8,
    pub magic: u8,
}

impl ArmorRating {
    pub fn get(&self, category: ArmorCategory) -> u8 {
        match category {
            ArmorCategory::Slash => self.slash,
            ArmorCategory::Pierce => self.pierce,
            ArmorCategory::Blunt => self.blunt,
            ArmorCategory::Magic => self.magic,
        }
    }

    pub fn uniform(value: u8) -> Self {
        Self {
            slash: value,
            pierce: value,
            blunt: value,
            magic: value,
        }
    }
}

/// Remaining condition of a worn item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Durability {
    pub current: u16,
    pub max: u16,
}

impl Durability {
    pub fn new(max: u16) -> Self {
        Self { current: max, max }
    }

    pub fn is_broken(&self) -> bool {
        self.current == 0
    }

    /// Wears the item down by one point, returning true once it breaks.
    pub fn degrade(&mut self) -> bool {
        self.current = self.current.saturating_sub(1);
        self.is_broken()
    }
}

/// Attack characteristics granted by a wielded weapon.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponProfile {
    /// Proficiency key that governs accuracy with this weapon.
    pub skill: String,
    /// Display noun used in hit messages ("slash", "stab").
    pub noun: String,
    pub damage_type: DamageType,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    Weapon(WeaponProfile),
    Armor {
        slot: WearSlot,
        rating: ArmorRating,
        durability: Durability,
    },
    /// A pile of coins worth `amount` currency.
    Coins { amount: u64 },
    Trinket,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub name: String,
    pub kind: ItemKind,
    pub level: u32,
}

impl Item {
    pub fn weapon(
        name: impl Into<String>,
        skill: impl Into<String>,
        noun: impl Into<String>,
        damage_type: DamageType,
    ) -> Self {
        Self {
            name: name.into(),
            kind: ItemKind::Weapon(WeaponProfile {
                skill: skill.into(),
                noun: noun.into(),
                damage_type,
            }),
            level: 1,
        }
    }

    pub fn armor(
        name: impl Into<String>,
        slot: WearSlot,
        rating: ArmorRating,
        durability: u16,
    ) -> Self {
        Self {
            name: name.into(),
            kind: ItemKind::Armor {
                slot,
                rating,
                durability: Durability::new(durability),
            },
            level: 1,
        }
    }

    pub fn coins(amount: u64) -> Self {
        let name = if amount == 1 {
            "a single gold coin".to_owned()
        } else {
            format!("{amount} gold coins")
        };
        Self {
            name,
            kind: ItemKind::Coins { amount },
            level: 0,
        }
    }

    pub fn trinket(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ItemKind::Trinket,
            level: 1,
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Slot the item is worn in, if wearable.
    pub fn wear_slot(&self) -> Option<WearSlot> {
        match &self.kind {
            ItemKind::Weapon(_) => Some(WearSlot::Wielded),
            ItemKind::Armor { slot, .. } => Some(*slot),
            ItemKind::Coins { .. } | ItemKind::Trinket => None,
        }
    }

    pub fn weapon_profile(&self) -> Option<&WeaponProfile> {
        match &self.kind {
            ItemKind::Weapon(profile) => Some(profile),
            _ => None,
        }
    }

    /// Absorption this item provides against `category`; broken armor gives none.
    pub fn absorption(&self, category: ArmorCategory) -> u8 {
        match &self.kind {
            ItemKind::Armor {
                rating, durability, ..
            } if !durability.is_broken() => rating.get(category),
            _ => 0,
        }
    }

    pub fn durability(&self) -> Option<Durability> {
        match &self.kind {
            ItemKind::Armor { durability, .. } => Some(*durability),
            _ => None,
        }
    }

    pub fn durability_mut(&mut self) -> Option<&mut Durability> {
        match &mut self.kind {
            ItemKind::Armor { durability, .. } => Some(durability),
            _ => None,
        }
    }

    pub fn coin_value(&self) -> u64 {
        match self.kind {
            ItemKind::Coins { amount } => amount,
            _ => 0,
        }
    }

    pub fn is_coins(&self) -> bool {
        matches!(self.kind, ItemKind::Coins { .. })
    }
}
