use engine::app::Rect;

/// HUD element categories that react to the pointer. The explicit
/// discriminants are the ids used in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ActionableType {
    LeftSkill = 0,
    LeftSelector = 1,
    Experience = 2,
    WalkRun = 3,
    Stamina = 4,
    MiniPanel = 5,
    RightSelector = 6,
    RightSkill = 7,
}

impl ActionableType {
    pub(crate) const ALL: [ActionableType; 8] = [
        ActionableType::LeftSkill,
        ActionableType::LeftSelector,
        ActionableType::Experience,
        ActionableType::WalkRun,
        ActionableType::Stamina,
        ActionableType::MiniPanel,
        ActionableType::RightSelector,
        ActionableType::RightSkill,
    ];

    pub(crate) fn id(self) -> i64 {
        self as i64
    }

    pub(crate) fn from_id(id: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    /// Name reported when the element is clicked.
    pub(crate) fn action_name(self) -> &'static str {
        match self {
            ActionableType::LeftSkill => "left_skill",
            ActionableType::LeftSelector => "left_skill_selector",
            ActionableType::Experience => "experience",
            ActionableType::WalkRun => "walk_run",
            ActionableType::Stamina => "stamina",
            ActionableType::MiniPanel => "mini_panel",
            ActionableType::RightSelector => "right_skill_selector",
            ActionableType::RightSkill => "right_skill",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ActionableRegion {
    pub(crate) kind: ActionableType,
    pub(crate) rect: Rect,
}

impl ActionableRegion {
    pub(crate) const fn new(kind: ActionableType, left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            kind,
            rect: Rect::new(left, top, width, height),
        }
    }
}

/// Hit boxes of the bottom control panel at 800x600.
pub(crate) const DEFAULT_REGIONS: [ActionableRegion; 8] = [
    ActionableRegion::new(ActionableType::LeftSkill, 115, 550, 50, 50),
    ActionableRegion::new(ActionableType::LeftSelector, 206, 563, 30, 30),
    ActionableRegion::new(ActionableType::Experience, 253, 560, 125, 5),
    ActionableRegion::new(ActionableType::WalkRun, 255, 573, 17, 20),
    ActionableRegion::new(ActionableType::Stamina, 273, 573, 105, 20),
    ActionableRegion::new(ActionableType::MiniPanel, 393, 563, 12, 23),
    ActionableRegion::new(ActionableType::RightSelector, 562, 563, 30, 30),
    ActionableRegion::new(ActionableType::RightSkill, 634, 550, 50, 50),
];

/// Every region containing the point, in table order.
pub(crate) fn regions_at(
    regions: &[ActionableRegion],
    x: i32,
    y: i32,
) -> impl Iterator<Item = &ActionableRegion> {
    regions.iter().filter(move |region| region.rect.contains(x, y))
}

pub(crate) fn first_region_at(regions: &[ActionableRegion], x: i32, y: i32) -> Option<&ActionableRegion> {
    regions_at(regions, x, y).next()
}
