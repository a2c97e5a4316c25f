use crate::behavior::Behavior;
use crate::catalog::BehaviorCategory;
use serde::{Deserialize, Serialize};

/// Strategies shipped with the simulator.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuiltinBehavior {
    Quack,
    Squeak,
    MuteQuack,
    Float,
    FlyWithWings,
    FlyNoWay,
    RocketPowered,
}

impl BuiltinBehavior {
    pub const ALL: [BuiltinBehavior; 7] = [
        BuiltinBehavior::Quack,
        BuiltinBehavior::Squeak,
        BuiltinBehavior::MuteQuack,
        BuiltinBehavior::Float,
        BuiltinBehavior::FlyWithWings,
        BuiltinBehavior::FlyNoWay,
        BuiltinBehavior::RocketPowered,
    ];

    /// Strategy every duck starts with when its definition leaves a category out.
    pub fn default_for(category: BehaviorCategory) -> Self {
        match category {
            BehaviorCategory::Quack => BuiltinBehavior::Quack,
            BehaviorCategory::Swim => BuiltinBehavior::Float,
            BehaviorCategory::Fly => BuiltinBehavior::FlyWithWings,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BuiltinBehavior::Quack => "quack",
            BuiltinBehavior::Squeak => "squeak",
            BuiltinBehavior::MuteQuack => "mute_quack",
            BuiltinBehavior::Float => "float",
            BuiltinBehavior::FlyWithWings => "fly_with_wings",
            BuiltinBehavior::FlyNoWay => "fly_no_way",
            BuiltinBehavior::RocketPowered => "rocket_powered",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.as_str() == name)
    }

    pub fn message(self) -> &'static str {
        match self {
            BuiltinBehavior::Quack => "Quack",
            BuiltinBehavior::Squeak => "Squeak",
            BuiltinBehavior::MuteQuack => "<< Silence >>",
            BuiltinBehavior::Float => "All ducks float, even decoys!",
            BuiltinBehavior::FlyWithWings => "I'm flying!!",
            BuiltinBehavior::FlyNoWay => "I can't fly",
            BuiltinBehavior::RocketPowered => "I'm flying with a rocket!",
        }
    }
}

impl Behavior for BuiltinBehavior {
    fn name(&self) -> &str {
        self.as_str()
    }

    fn category(&self) -> BehaviorCategory {
        match self {
            BuiltinBehavior::Quack | BuiltinBehavior::Squeak | BuiltinBehavior::MuteQuack => {
                BehaviorCategory::Quack
            }
            BuiltinBehavior::Float => BehaviorCategory::Swim,
            BuiltinBehavior::FlyWithWings
            | BuiltinBehavior::FlyNoWay
            | BuiltinBehavior::RocketPowered => BehaviorCategory::Fly,
        }
    }

    fn execute(&self) -> String {
        self.message().to_string()
    }
}

/// Strategy declared in a catalog file that answers with a fixed message.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScriptedBehavior {
    pub name: String,
    pub category: BehaviorCategory,
    pub message: String,
}

impl Behavior for ScriptedBehavior {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> BehaviorCategory {
        self.category
    }

    fn execute(&self) -> String {
        self.message.clone()
    }
}
