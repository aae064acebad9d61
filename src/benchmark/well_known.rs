//! Chain conventions the synthesizer relies on.
//!
//! Everything address- or name-specific lives in one immutable [`WellKnown`]
//! table that is injected into synthesis. Search logic never matches on
//! literal addresses; substituting a different table retargets it.
//!
//! # Usage
//!
//! ```
//! use sui_ptb_synth::benchmark::well_known::WellKnown;
//!
//! let wk = WellKnown::default();
//! assert_eq!(wk.native_coin_type.to_string(), "0x2::sui::SUI");
//! assert_eq!(wk.context_type.to_string(), "0x2::tx_context::TxContext");
//! ```

use sui_synth_types::framework::{
    ASCII_MODULE, CLOCK_MODULE, CLOCK_OBJECT_ID, CLOCK_TYPE, COIN_MODULE, COIN_TYPE,
    DENY_LIST_MODULE, DENY_LIST_OBJECT_ID, DENY_LIST_TYPE, MOVE_STDLIB, OPTION_MODULE,
    OPTION_TYPE, RANDOM_MODULE, RANDOM_OBJECT_ID, RANDOM_TYPE, STRING_MODULE, STRING_TYPE,
    SUI_FRAMEWORK, SUI_MODULE, SUI_TYPE, URL_MODULE, URL_TYPE,
};
use sui_synth_types::move_type::tx_context_type_name;
use sui_synth_types::{AccountAddress, DatatypeTag, MoveType, TypeName};

/// A shared object the executor supplies by id (`&Clock`, `&Random`, `&DenyList`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedObject {
    /// Label emitted in the plan (`clock`, `random`, `deny_list`).
    pub name: String,
    pub type_name: TypeName,
    pub object_id: AccountAddress,
}

/// How a standard recipe builds its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeKind {
    /// One call taking the placeholder string bytes.
    StringFromBytes,
    /// One call taking the placeholder URL bytes.
    UrlFromBytes,
    /// Zero-argument call instantiated with the wrapped type.
    OptionNone,
}

/// A fixed, non-recursive way to produce a standard wrapper type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    /// Matched by exact address, module, and name.
    pub produces: TypeName,
    pub module: String,
    pub function: String,
    pub kind: RecipeKind,
}

impl Recipe {
    fn new(produces: TypeName, function: &str, kind: RecipeKind) -> Self {
        Self {
            module: produces.module.clone(),
            produces,
            function: function.to_string(),
            kind,
        }
    }

    /// `0xADDR::module::function` of the recipe call.
    pub fn target(&self) -> String {
        format!(
            "{}::{}::{}",
            self.produces.address.to_hex_literal(),
            self.module,
            self.function
        )
    }
}

/// The immutable configuration table of chain conventions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WellKnown {
    /// Implicit trailing context parameter (`0x2::tx_context::TxContext`).
    pub context_type: TypeName,
    /// Default concrete type for generics (`0x2::sui::SUI`).
    pub native_coin_type: MoveType,
    /// Owned coin wrapper (`0x2::coin::Coin`); `&Coin<native>` becomes a sender coin.
    pub coin_type: TypeName,
    pub shared_objects: Vec<SharedObject>,
    pub recipes: Vec<Recipe>,
    /// Literal used for every `address` parameter.
    pub dummy_address: AccountAddress,
    /// Literal used for every `vector<u8>` parameter.
    pub default_bytes: Vec<u8>,
    /// Bytes passed to the string recipes.
    pub placeholder_string: String,
    /// Bytes passed to the URL recipe.
    pub placeholder_url: String,
}

impl Default for WellKnown {
    fn default() -> Self {
        Self::sui()
    }
}

impl WellKnown {
    /// Sui mainnet conventions.
    pub fn sui() -> Self {
        let shared = |name: &str, module: &str, ty: &str, id: AccountAddress| SharedObject {
            name: name.to_string(),
            type_name: TypeName::new(SUI_FRAMEWORK, module, ty),
            object_id: id,
        };

        Self {
            context_type: tx_context_type_name(),
            native_coin_type: MoveType::datatype(SUI_FRAMEWORK, SUI_MODULE, SUI_TYPE, vec![]),
            coin_type: TypeName::new(SUI_FRAMEWORK, COIN_MODULE, COIN_TYPE),
            shared_objects: vec![
                shared("clock", CLOCK_MODULE, CLOCK_TYPE, CLOCK_OBJECT_ID),
                shared("random", RANDOM_MODULE, RANDOM_TYPE, RANDOM_OBJECT_ID),
                shared("deny_list", DENY_LIST_MODULE, DENY_LIST_TYPE, DENY_LIST_OBJECT_ID),
            ],
            recipes: vec![
                Recipe::new(
                    TypeName::new(MOVE_STDLIB, STRING_MODULE, STRING_TYPE),
                    "utf8",
                    RecipeKind::StringFromBytes,
                ),
                Recipe::new(
                    TypeName::new(MOVE_STDLIB, ASCII_MODULE, STRING_TYPE),
                    "string",
                    RecipeKind::StringFromBytes,
                ),
                Recipe::new(
                    TypeName::new(SUI_FRAMEWORK, URL_MODULE, URL_TYPE),
                    "new_unsafe_from_bytes",
                    RecipeKind::UrlFromBytes,
                ),
                Recipe::new(
                    TypeName::new(MOVE_STDLIB, OPTION_MODULE, OPTION_TYPE),
                    "none",
                    RecipeKind::OptionNone,
                ),
            ],
            dummy_address: AccountAddress::ZERO,
            default_bytes: vec![0x01],
            placeholder_string: "sui".to_string(),
            placeholder_url: "https://example.com".to_string(),
        }
    }

    /// Shared object referenced by `ty`, if `ty` names one (type arguments ignored).
    pub fn shared_object(&self, ty: &MoveType) -> Option<&SharedObject> {
        let tag = ty.datatype_tag()?;
        self.shared_objects.iter().find(|o| o.type_name.matches(tag))
    }

    pub fn is_context(&self, ty: &MoveType) -> bool {
        ty.datatype_tag()
            .is_some_and(|tag| self.context_type.matches(tag))
    }

    /// True for `Coin<native>`.
    pub fn is_native_coin(&self, ty: &MoveType) -> bool {
        ty.datatype_tag().is_some_and(|tag| {
            self.coin_type.matches(tag)
                && tag.type_args.len() == 1
                && tag.type_args[0] == self.native_coin_type
        })
    }

    pub fn recipe_for(&self, tag: &DatatypeTag) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.produces.matches(tag))
    }

    /// Replace every type parameter in `ty` with the native coin type.
    pub fn concretize(&self, ty: &MoveType) -> MoveType {
        match ty {
            MoveType::TypeParam { .. } => self.native_coin_type.clone(),
            MoveType::Vector { inner } => MoveType::vector(self.concretize(inner)),
            MoveType::Reference { mutable, to } => {
                MoveType::reference(*mutable, self.concretize(to))
            }
            MoveType::Datatype(tag) => MoveType::Datatype(DatatypeTag {
                address: tag.address,
                module: tag.module.clone(),
                name: tag.name.clone(),
                type_args: tag.type_args.iter().map(|t| self.concretize(t)).collect(),
            }),
            _ => ty.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sui_synth_types::parse_move_type;

    fn ty(s: &str) -> MoveType {
        parse_move_type(s).unwrap()
    }

    #[test]
    fn test_shared_objects() {
        let wk = WellKnown::default();
        let clock = wk.shared_object(&ty("0x2::clock::Clock")).unwrap();
        assert_eq!(clock.name, "clock");
        assert_eq!(clock.object_id, CLOCK_OBJECT_ID);
        assert_eq!(
            wk.shared_object(&ty("0x2::deny_list::DenyList")).unwrap().object_id.to_hex_literal(),
            "0x403"
        );
        assert!(wk.shared_object(&ty("0xabc::clock::Clock")).is_none());
        assert!(wk.shared_object(&MoveType::U64).is_none());
    }

    #[test]
    fn test_native_coin_detection() {
        let wk = WellKnown::default();
        assert!(wk.is_native_coin(&ty("0x2::coin::Coin<0x2::sui::SUI>")));
        assert!(!wk.is_native_coin(&ty("0x2::coin::Coin<0xabc::usdc::USDC>")));
        assert!(!wk.is_native_coin(&ty("0x2::balance::Balance<0x2::sui::SUI>")));
    }

    #[test]
    fn test_recipes_match_exact_identity() {
        let wk = WellKnown::default();
        let utf8 = ty("0x1::string::String");
        let recipe = wk.recipe_for(utf8.datatype_tag().unwrap()).unwrap();
        assert_eq!(recipe.target(), "0x1::string::utf8");

        let ascii = ty("0x1::ascii::String");
        assert_eq!(
            wk.recipe_for(ascii.datatype_tag().unwrap()).unwrap().target(),
            "0x1::ascii::string"
        );

        // Same name, different module address
        let fake = ty("0x2::string::String");
        assert!(wk.recipe_for(fake.datatype_tag().unwrap()).is_none());

        let option = ty("0x1::option::Option<u64>");
        assert_eq!(
            wk.recipe_for(option.datatype_tag().unwrap()).unwrap().kind,
            RecipeKind::OptionNone
        );
    }

    #[test]
    fn test_concretize_replaces_all_type_params() {
        let wk = WellKnown::default();
        let generic = ty("0x1::option::Option<vector<T1>>");
        assert_eq!(
            wk.concretize(&generic).to_string(),
            "0x1::option::Option<vector<0x2::sui::SUI>>"
        );
    }
}
