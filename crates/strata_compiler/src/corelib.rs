//! The built-in core library.
//!
//! Primitive values get their apparent members from globally declared
//! interfaces named `Number`, `String`, and `Boolean`; array types get
//! theirs from the global `Array<T>`. Embedders that want a richer
//! environment declare their own globals on top of these.

use strata_ast::builder::AstBuilder;
use strata_ast::types::NodeId;

/// Declarations every session starts with, as one synthetic unit.
pub fn core_library_unit(b: &mut AstBuilder) -> NodeId {
    let object = object_interface(b);
    let number = number_interface(b);
    let string = string_interface(b);
    let boolean = boolean_interface(b);
    let array = array_interface(b);
    b.unit("lib.core", vec![object, number, string, boolean, array])
}

fn object_interface(b: &mut AstBuilder) -> NodeId {
    let string_ty = b.string_ty();
    let to_string = b.method("toString", vec![], Some(string_ty), None);
    let name_ty = b.string_ty();
    let name = b.param("name", Some(name_ty));
    let boolean_ty = b.boolean_ty();
    let has_own = b.method("hasOwnProperty", vec![name], Some(boolean_ty), None);
    b.interface("Object", vec![], vec![to_string, has_own])
}

fn number_interface(b: &mut AstBuilder) -> NodeId {
    let radix_ty = b.number_ty();
    let radix = b.opt_param("radix", Some(radix_ty));
    let ret = b.string_ty();
    let to_string = b.method("toString", vec![radix], Some(ret), None);
    let digits_ty = b.number_ty();
    let digits = b.opt_param("fractionDigits", Some(digits_ty));
    let ret = b.string_ty();
    let to_fixed = b.method("toFixed", vec![digits], Some(ret), None);
    b.interface("Number", vec![], vec![to_string, to_fixed])
}

fn string_interface(b: &mut AstBuilder) -> NodeId {
    let number_ty = b.number_ty();
    let length = b.prop_sig("length", Some(number_ty));

    let pos_ty = b.number_ty();
    let pos = b.param("pos", Some(pos_ty));
    let ret = b.string_ty();
    let char_at = b.method("charAt", vec![pos], Some(ret), None);

    let index_ty = b.number_ty();
    let index = b.param("index", Some(index_ty));
    let ret = b.number_ty();
    let char_code_at = b.method("charCodeAt", vec![index], Some(ret), None);

    let search_ty = b.string_ty();
    let search = b.param("searchString", Some(search_ty));
    let ret = b.number_ty();
    let index_of = b.method("indexOf", vec![search], Some(ret), None);

    let other_ty = b.string_ty();
    let other = b.param("other", Some(other_ty));
    let ret = b.string_ty();
    let concat = b.method("concat", vec![other], Some(ret), None);

    let start_ty = b.number_ty();
    let start = b.param("start", Some(start_ty));
    let end_ty = b.number_ty();
    let end = b.opt_param("end", Some(end_ty));
    let ret = b.string_ty();
    let substring = b.method("substring", vec![start, end], Some(ret), None);

    let ret = b.string_ty();
    let to_upper = b.method("toUpperCase", vec![], Some(ret), None);
    let ret = b.string_ty();
    let to_lower = b.method("toLowerCase", vec![], Some(ret), None);

    let sep_ty = b.string_ty();
    let sep = b.param("separator", Some(sep_ty));
    let elem = b.string_ty();
    let ret = b.array_ty(elem);
    let split = b.method("split", vec![sep], Some(ret), None);

    b.interface(
        "String",
        vec![],
        vec![length, char_at, char_code_at, index_of, concat, substring, to_upper, to_lower, split],
    )
}

fn boolean_interface(b: &mut AstBuilder) -> NodeId {
    let ret = b.string_ty();
    let to_string = b.method("toString", vec![], Some(ret), None);
    b.interface("Boolean", vec![], vec![to_string])
}

fn array_interface(b: &mut AstBuilder) -> NodeId {
    let t = b.type_param("T", None);

    let number_ty = b.number_ty();
    let length = b.prop_sig("length", Some(number_ty));

    let item_ty = b.type_ref("T");
    let item = b.param("item", Some(item_ty));
    let ret = b.number_ty();
    let push = b.method("push", vec![item], Some(ret), None);

    let ret = b.type_ref("T");
    let pop = b.method("pop", vec![], Some(ret), None);

    let elem = b.type_ref("T");
    let other_ty = b.array_ty(elem);
    let other = b.param("items", Some(other_ty));
    let elem = b.type_ref("T");
    let ret = b.array_ty(elem);
    let concat = b.method("concat", vec![other], Some(ret), None);

    let sep_ty = b.string_ty();
    let sep = b.opt_param("separator", Some(sep_ty));
    let ret = b.string_ty();
    let join = b.method("join", vec![sep], Some(ret), None);

    let item_ty = b.type_ref("T");
    let item = b.param("searchElement", Some(item_ty));
    let ret = b.number_ty();
    let index_of = b.method("indexOf", vec![item], Some(ret), None);

    let start_ty = b.number_ty();
    let start = b.opt_param("start", Some(start_ty));
    let end_ty = b.number_ty();
    let end = b.opt_param("end", Some(end_ty));
    let elem = b.type_ref("T");
    let ret = b.array_ty(elem);
    let slice = b.method("slice", vec![start, end], Some(ret), None);

    let elem = b.type_ref("T");
    let ret = b.array_ty(elem);
    let reverse = b.method("reverse", vec![], Some(ret), None);

    b.generic_interface(
        "Array",
        vec![t],
        vec![],
        vec![length, push, pop, concat, join, index_of, slice, reverse],
    )
}
